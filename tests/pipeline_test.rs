mod common;

use assetdiff::crypto::{self, KeyMaterial};
use assetdiff::decompress::decompress;
use assetdiff::diagnostics::Diagnostic;
use assetdiff::directory::CharacterDirectory;
use assetdiff::error::{CatalogError, DecompressionError, DecryptionError, StageError};
use assetdiff::extract::extract;
use assetdiff::pipeline::{comparison_report, decode_catalog, single_report, CatalogSource};
use assetdiff::report::{ReportFilters, NO_RESULTS, UNCLASSIFIED_SQUAD};
use assetdiff::AssetPath;
use common::*;
use tempfile::tempdir;

fn strs(paths: &assetdiff::PathSet) -> Vec<&str> {
    paths.sorted().into_iter().map(AssetPath::as_str).collect()
}

#[test]
fn known_catalog_decodes_to_its_single_path() {
    let gz = gzip(b"Assets/chars/c001_icon.png");
    assert_eq!(&gz[..4], &[0x1f, 0x8b, 0x08, 0x00]);

    let ciphertext = encrypt(&gz);
    assert_eq!(ciphertext.len() % crypto::BLOCK_SIZE, 0);

    let plaintext = crypto::decrypt(ciphertext, &key()).unwrap();
    assert_eq!(plaintext, gz);

    let inflated = decompress(&plaintext).unwrap();
    assert_eq!(inflated, b"Assets/chars/c001_icon.png");

    let extraction = extract(&inflated);
    assert_eq!(strs(&extraction.paths), vec!["Assets/chars/c001_icon.png"]);
    assert!(extraction.diagnostics.is_empty());
}

#[test]
fn partial_block_fails_before_decryption() {
    let err = decode_catalog(vec![0u8; 31], &key()).unwrap_err();
    assert_eq!(err, StageError::Decryption(DecryptionError::InvalidLength { len: 31 }));
}

#[test]
fn valid_padding_around_non_gzip_is_a_corrupt_stream() {
    let ciphertext = encrypt(b"perfectly padded, but not gzip at all");
    let err = decode_catalog(ciphertext, &key()).unwrap_err();
    assert!(matches!(err, StageError::Decompression(DecompressionError::CorruptStream { .. })));
}

#[test]
fn wrong_key_never_yields_paths() {
    let ciphertext = seal_catalog(&catalog_content(&["Assets/a.png"]));
    let wrong = KeyMaterial::from_hex(OTHER_KEY_HEX, IV_HEX).unwrap();
    // padding usually fails; if it happens to validate, gzip will not
    assert!(decode_catalog(ciphertext, &wrong).is_err());
}

#[test]
fn catalog_with_no_paths_is_advisory() {
    let ciphertext = seal_catalog(&[0u8, 1, 2, 3, 0xff]);
    let extraction = decode_catalog(ciphertext, &key()).unwrap();
    assert!(extraction.paths.is_empty());
    assert_eq!(extraction.diagnostics, vec![Diagnostic::EmptyExtraction]);
}

#[test]
fn comparison_reports_added_path_as_unclassified() {
    let dir = tempdir().unwrap();
    let new = write_catalog(dir.path(), "catalog_new.bin", &["Assets/a.png", "Assets/b.png"]);
    let old = write_catalog(dir.path(), "catalog_old.bin", &["Assets/a.png"]);

    let report = comparison_report(
        &CatalogSource::Catalog { path: new, key: key() },
        &CatalogSource::Catalog { path: old, key: key() },
        &CharacterDirectory::new(),
        &ReportFilters::new(),
    )
    .unwrap();

    assert_eq!(report.title, "'catalog_new.bin' vs 'catalog_old.bin' comparison");
    let squads: Vec<&str> = report.tree.iter().map(|(s, _)| s).collect();
    assert_eq!(squads, vec![UNCLASSIFIED_SQUAD]);
    assert_eq!(report.tree.total(), 1);

    let text = report.to_text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[1], "Total: 1 asset(s) found.");
    assert!(lines.contains(&"  - Assets/b.png"));
    assert!(!text.contains("Assets/a.png"));
}

#[test]
fn comparison_classifies_with_character_table() {
    let dir = tempdir().unwrap();
    let csv = write_file(dir.path(), "character_info.csv", CHARACTER_CSV.as_bytes());
    let directory = CharacterDirectory::load(&csv).unwrap();

    let new = write_catalog(
        dir.path(),
        "v2.bin",
        &[
            "Assets/chars/rkayamori/face_02.png",
            "Assets/chars/mtojo/face_01.png",
            "Assets/Voice/vo_YIzumi_001.ogg",
            "Assets/ui/title.png",
        ],
    );
    let old = write_catalog(dir.path(), "v1.bin", &["Assets/chars/mtojo/face_01.png"]);
    let new = CatalogSource::Catalog { path: new, key: key() };
    let old = CatalogSource::Catalog { path: old, key: key() };

    let report = comparison_report(&new, &old, &directory, &ReportFilters::new()).unwrap();
    assert_eq!(report.tree.total(), 3);
    assert_eq!(report.tree.squad("31A").map(|c| c.len()), Some(2));
    assert!(report.tree.squad("31B").is_none());
    assert!(report.tree.squad(UNCLASSIFIED_SQUAD).is_some());

    let yuki_only = ReportFilters::new().with_characters(["Yuki"]);
    let filtered = comparison_report(&new, &old, &directory, &yuki_only).unwrap();
    assert_eq!(filtered.tree.total(), 1);
    assert!(filtered.to_text().contains("Assets/Voice/vo_YIzumi_001.ogg"));
}

#[test]
fn single_report_over_a_listing() {
    let dir = tempdir().unwrap();
    let listing = write_file(dir.path(), "v1.txt", b"Assets/a.png\nAssets/b.png\n\nnot-a-path\n");
    let report = single_report(
        &CatalogSource::Listing { path: listing },
        &CharacterDirectory::new(),
        &ReportFilters::new().with_keyword(Some("B.PNG")),
    )
    .unwrap();

    assert_eq!(report.title, "'v1.txt' analysis");
    assert_eq!(report.tree.total(), 1);
    assert!(report
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::InvalidListingLine { line_no: 4, .. })));
}

#[test]
fn filters_on_an_empty_result_render_the_sentinel() {
    let dir = tempdir().unwrap();
    let cat = write_catalog(dir.path(), "only_misc.bin", &["Assets/misc/a.png"]);
    let report = single_report(
        &CatalogSource::Catalog { path: cat, key: key() },
        &CharacterDirectory::new(),
        &ReportFilters::new().with_squads(["31A"]),
    )
    .unwrap();
    assert_eq!(report.to_text(), NO_RESULTS);
}

#[test]
fn missing_catalog_is_input_not_found() {
    let dir = tempdir().unwrap();
    let err = single_report(
        &CatalogSource::Catalog { path: dir.path().join("nope.bin"), key: key() },
        &CharacterDirectory::new(),
        &ReportFilters::new(),
    )
    .unwrap_err();
    assert!(matches!(err, CatalogError::InputNotFound { .. }));
}

#[test]
fn decode_failure_names_the_file() {
    let dir = tempdir().unwrap();
    let good = write_catalog(dir.path(), "good.bin", &["Assets/a.png"]);
    let bad = write_file(dir.path(), "broken.bin", &[0u8; 33]);

    let err = comparison_report(
        &CatalogSource::Catalog { path: good, key: key() },
        &CatalogSource::Catalog { path: bad, key: key() },
        &CharacterDirectory::new(),
        &ReportFilters::new(),
    )
    .unwrap_err();

    match &err {
        CatalogError::Decode { file, source } => {
            assert!(file.ends_with("broken.bin"));
            assert_eq!(*source, StageError::Decryption(DecryptionError::InvalidLength { len: 33 }));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(err.to_string().contains("broken.bin"));
}
