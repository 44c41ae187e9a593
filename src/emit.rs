use std::borrow::Cow;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::config::Config;
use crate::metadata::BuildMetadata;
use crate::types::{write_error, AppError};

pub fn render_header(meta: &BuildMetadata, prefix: &str) -> String {
    let defines = [
        ("NAME", meta.name.as_str()),
        ("VERSION", meta.version.as_str()),
        ("BUILD_COMMIT", meta.commit.as_str()),
        ("BUILD_BRANCH", meta.branch.as_str()),
        ("BUILD_STATUS", meta.status.as_str()),
        ("BUILD_TIMESTAMP", meta.timestamp.as_str()),
    ];
    let mut out = String::from("#pragma once\n\n// Automatically generated build information\n");
    for (key, value) in defines {
        out.push_str(&format!("#define {}_{} \"{}\"\n", prefix, key, escape_c(value)));
    }
    out
}

// keep the literal a valid C string
fn escape_c(value: &str) -> Cow<'_, str> {
    if value.contains(['\\', '"']) {
        Cow::Owned(value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        Cow::Borrowed(value)
    }
}

/// Pretty printing that writes every non-ASCII character as a `\uXXXX`
/// escape (UTF-16 code units, surrogate pairs above the BMP).
struct AsciiFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl<'a> AsciiFormatter<'a> {
    fn with_indent(indent: &'a [u8]) -> Self {
        AsciiFormatter { inner: PrettyFormatter::with_indent(indent) }
    }
}

impl Formatter for AsciiFormatter<'_> {
    fn write_string_fragment<W: ?Sized + io::Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }
        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if c.is_ascii() {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }

    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}

/// Pretty JSON, 4-space indent, ASCII only, no trailing newline.
pub fn render_json(meta: &BuildMetadata) -> Result<Vec<u8>, AppError> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, AsciiFormatter::with_indent(b"    "));
    meta.serialize(&mut ser)?;
    Ok(buf)
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), AppError> {
    let mut file = File::create(path).await.map_err(write_error(path))?;
    file.write_all(contents).await.map_err(write_error(path))?;
    file.flush().await.map_err(write_error(path))?;
    log::info!("wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

/// Header first, then JSON. A failed JSON write leaves the fresh header behind.
pub async fn write_outputs(config: &Config, meta: &BuildMetadata) -> Result<(), AppError> {
    let header = render_header(meta, &config.define_prefix);
    let json = render_json(meta)?;
    write_file(&config.header_path(), header.as_bytes()).await?;
    write_file(&config.json_path(), &json).await?;
    Ok(())
}
