//! Integration Tests for the reference rewriter
//!
//! 一時ディレクトリ上のTEI文書を書き換え、人物リストの除去と参照の修飾を検証します。

use std::fs;
use std::path::Path;
use teipeople::{ConfigBuilder, Rewriter};

const LETTER: &str = r##"<TEI xmlns="http://www.tei-c.org/ns/1.0">
    <teiHeader>
        <profileDesc>
            <listPerson>
                <person xml:id="person-5">
                    <persName>Jane Doe</persName>
                </person>
            </listPerson>
        </profileDesc>
    </teiHeader>
    <text>
        <body>
            <p>Dear <persName ref="#person-5">Jane</persName>,</p>
        </body>
    </text>
</TEI>
"##;

const REWRITTEN: &str = r##"<TEI xmlns="http://www.tei-c.org/ns/1.0">
    <teiHeader>
        <profileDesc>
        </profileDesc>
    </teiHeader>
    <text>
        <body>
            <p>Dear <persName ref="../metadata/people.xml#person-5">Jane</persName>,</p>
        </body>
    </text>
</TEI>
"##;

/// `<tmp>/letters`を対象ルート、`<tmp>/metadata/people.xml`を出力先とする設定
fn setup(dir: &Path) -> teipeople::Config {
    fs::create_dir_all(dir.join("letters")).unwrap();
    ConfigBuilder::new(dir.join("letters"))
        .with_output(dir.join("metadata").join("people.xml"))
        .build()
        .unwrap()
}

#[test]
fn test_rewrite_removes_listing_and_qualifies_refs() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());
    let target = dir.path().join("letters").join("GB-0001.xml");
    fs::write(&target, LETTER).unwrap();

    let report = Rewriter::new(&config).run().unwrap();
    assert_eq!(report.files_found, 1);
    assert_eq!(report.files_changed, 1);
    assert_eq!(report.listings_removed, 1);
    assert_eq!(report.references_qualified, 1);

    let content = fs::read_to_string(&target).unwrap();
    assert_eq!(content, REWRITTEN);
}

#[test]
fn test_rewrite_twice_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());
    let target = dir.path().join("letters").join("GB-0002.xml");
    fs::write(&target, LETTER).unwrap();

    let rewriter = Rewriter::new(&config);
    rewriter.run().unwrap();
    let second = rewriter.run().unwrap();

    assert_eq!(second.files_found, 1);
    assert_eq!(second.files_changed, 0);
    assert_eq!(second.references_qualified, 0);
    assert_eq!(fs::read_to_string(&target).unwrap(), REWRITTEN);
}

#[test]
fn test_only_matching_files_directly_under_root() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());
    let root = dir.path().join("letters");

    let other = root.join("index.xml");
    fs::write(&other, LETTER).unwrap();
    fs::create_dir_all(root.join("drafts")).unwrap();
    let nested = root.join("drafts").join("GB-0003.xml");
    fs::write(&nested, LETTER).unwrap();
    fs::create_dir_all(root.join("GB-dir.xml")).unwrap();
    fs::write(root.join("GB-0004.xml"), LETTER).unwrap();

    let rewriter = Rewriter::new(&config);
    let targets = rewriter.targets().unwrap();
    assert_eq!(targets, vec![root.join("GB-0004.xml")]);

    rewriter.run().unwrap();
    assert_eq!(fs::read_to_string(other).unwrap(), LETTER);
    assert_eq!(fs::read_to_string(nested).unwrap(), LETTER);
}

#[test]
fn test_file_without_listing_or_refs_is_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());
    let target = dir.path().join("letters").join("GB-0005.xml");
    let content = "<TEI>\n    <text/>\n</TEI>\n";
    fs::write(&target, content).unwrap();

    let report = Rewriter::new(&config).run().unwrap();
    assert_eq!(report.files_found, 1);
    assert_eq!(report.files_changed, 0);
    assert_eq!(fs::read_to_string(&target).unwrap(), content);
}

#[test]
fn test_no_targets() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());

    let report = Rewriter::new(&config).run().unwrap();
    assert_eq!(report.files_found, 0);
    assert_eq!(report.files_changed, 0);
}

#[test]
fn test_output_next_to_targets() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new(dir.path()).build().unwrap();
    let target = dir.path().join("GB-0006.xml");
    fs::write(&target, r##"<rs ref="#person-9"/>"##).unwrap();

    Rewriter::new(&config).run().unwrap();
    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        r##"<rs ref="metadata/people.xml#person-9"/>"##
    );
}

#[test]
fn test_self_closing_listing_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());
    let target = dir.path().join("letters").join("GB-0007.xml");
    let letter = LETTER.replace(
        "<teiHeader>",
        "<teiHeader>\n        <particDesc><listPerson/></particDesc>",
    );
    fs::write(&target, &letter).unwrap();

    let report = Rewriter::new(&config).run().unwrap();
    assert_eq!(report.listings_removed, 1);

    let expected = REWRITTEN.replace(
        "<teiHeader>",
        "<teiHeader>\n        <particDesc><listPerson/></particDesc>",
    );
    assert_eq!(fs::read_to_string(&target).unwrap(), expected);
}
