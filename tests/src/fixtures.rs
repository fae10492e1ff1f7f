//! Rule-set fixtures written to temporary directories.

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;
use zip::write::FileOptions;
use zip::ZipWriter;

/// Write `files` (relative path, contents) under a fresh temporary directory.
pub fn rule_set_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    for (path, body) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("create list dir");
        }
        fs::write(full, body).expect("write list");
    }
    dir
}

/// Pack `files` into `rules.zip` inside a fresh temporary directory.
pub fn rule_set_zip(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("rules.zip");
    let mut writer = ZipWriter::new(File::create(&path).expect("create zip"));
    for (name, body) in files {
        writer
            .start_file(*name, FileOptions::default())
            .expect("start zip entry");
        writer.write_all(body.as_bytes()).expect("write zip entry");
    }
    writer.finish().expect("finish zip");
    (dir, path)
}

/// A page that mixes visible text, attributes, script and style.
pub fn sample_page(body_words: usize) -> String {
    let mut page = String::from(
        "<html><head><title>News</title><style>.a { color: red }</style>\
         <script>var x = 'kill the president';</script></head><body>",
    );
    for i in 0..body_words {
        if i % 40 == 0 {
            page.push_str("<p><a href=\"/story\" class=\"link\">");
        }
        page.push_str(["local ", "weather ", "<b>report</b> ", "today ", "and "][i % 5]);
        if i % 40 == 39 {
            page.push_str("</a></p>\n");
        }
    }
    page.push_str("<img src=\"x.png\" alt=\"family picnic photo\"></body></html>");
    page
}
