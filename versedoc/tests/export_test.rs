use std::fs;
use std::io::Read;
use std::path::Path;
use versedoc::{build_document, docx_rs_exporter, ExportInput, ExportRequest};

const VERSES_CSV: &str = "\
book,chapter,verse,absolute,content
Gen,1,1,1,In the beginning God created the heaven and the earth.
Gen,1,2,2,\"And the earth was without form<br/>, and void\"
Gen,2,1,32,\"<div class=\"\"title\"\">The Sabbath</div>Thus the heavens were finished\"
";

const NOTES_TOML: &str = r#"
gen = { text = "Notes on **Genesis**" }
"gen-2" = { text = "- first point\n- second point\n" }
"gen-32" = { text = "Day of rest\n\n---\n\n> quoted" }
"#;

fn write_export(dir: &Path, books: &str) {
    let config = format!(
        r#"
title = "Creation"
translation = "KJV"
verses = "verses.csv"
notes = "notes.toml"
{books}

[translations.KJV]
description = "King James Version"
distribution_license = "Public Domain"
"#
    );
    fs::write(dir.join("versedoc.toml"), config).unwrap();
    fs::write(dir.join("verses.csv"), VERSES_CSV).unwrap();
    fs::write(dir.join("notes.toml"), NOTES_TOML).unwrap();
}

fn read_document_xml(path: &Path) -> String {
    read_part(path, "word/document.xml")
}

fn read_part(path: &Path, name: &str) -> String {
    let file = fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut xml = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

#[test]
fn test_notes_export_writes_table_docx() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    write_export(dir.path(), "");
    let output = dir.path().join("out/notes.docx");

    // Act
    let input = ExportInput::load(dir.path()).unwrap();
    let document = build_document(&ExportRequest::from_input(&input), &input.config.catalog())
        .unwrap();
    docx_rs_exporter::to_docx(&document, &output).unwrap();

    // Assert
    assert_eq!(document.table_count(), 2);
    assert!(output.exists(), "output file should be created");
    let xml = read_document_xml(&output);
    assert!(xml.contains("In the beginning God created"));
    assert!(xml.contains("Thus the heavens were finished"));
    assert!(!xml.contains("The Sabbath"), "div content must be stripped");
    assert!(xml.contains("second point"));
    assert!(xml.contains("<w:tbl>") || xml.contains("<w:tbl "));
}

/// Contents of the first `<w:pBdr>` element
fn first_paragraph_borders(xml: &str) -> &str {
    let start = xml.find("<w:pBdr>").expect("paragraph border");
    let end = start + xml[start..].find("</w:pBdr>").expect("closed paragraph border");
    &xml[start..end]
}

#[test]
fn test_rule_and_verse_numbers_are_formatted() {
    let dir = tempfile::tempdir().unwrap();
    write_export(dir.path(), "");
    let output = dir.path().join("notes.docx");

    let input = ExportInput::load(dir.path()).unwrap();
    let document = build_document(&ExportRequest::from_input(&input), &input.config.catalog())
        .unwrap();
    docx_rs_exporter::to_docx(&document, &output).unwrap();

    let xml = read_document_xml(&output);
    assert!(xml.contains(r#"<w:vertAlign w:val="superscript""#));
    let rule = first_paragraph_borders(&xml);
    assert!(rule.contains("<w:bottom"));
    assert!(!rule.contains("<w:top"), "a rule has no box border");
    assert!(!rule.contains("<w:left"));

    let styles = read_part(&output, "word/styles.xml");
    assert!(styles.contains("BBBBBB"), "blockquote left border");
    assert!(styles.contains(r#"w:val="double""#), "heading 2 underline");
}

#[test]
fn test_tag_export_writes_reference_headings() {
    let dir = tempfile::tempdir().unwrap();
    write_export(
        dir.path(),
        "[[books]]\nshort_title = \"Gen\"\nlong_title = \"Genesis\"\n",
    );
    let output = dir.path().join("tags.docx");

    let input = ExportInput::load(dir.path()).unwrap();
    let document = build_document(&ExportRequest::from_input(&input), &input.config.catalog())
        .unwrap();
    docx_rs_exporter::to_docx(&document, &output).unwrap();

    assert_eq!(document.table_count(), 0);
    let xml = read_document_xml(&output);
    assert!(xml.contains("Genesis 1:1-2"));
    assert!(xml.contains("Genesis 2:1"));
}

#[test]
fn test_unknown_translation_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_export(dir.path(), "");
    let config = fs::read_to_string(dir.path().join("versedoc.toml"))
        .unwrap()
        .replace("translation = \"KJV\"", "translation = \"ASV\"");
    fs::write(dir.path().join("versedoc.toml"), config).unwrap();

    let input = ExportInput::load(dir.path()).unwrap();
    let result = build_document(&ExportRequest::from_input(&input), &input.config.catalog());

    assert!(result.is_err());
}
