use crate::cli::OutputFormat;
use crate::extract::ResultList;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
struct FileMetadata<'a> {
    file: String,
    metadata: &'a ResultList,
}

/// Renders the metadata of each file as it is extracted
pub enum MetadataWriter<W: Write> {
    Text(W),
    Json(W),
    Csv(csv::Writer<W>),
}

impl<W: Write> MetadataWriter<W> {
    pub fn new(format: OutputFormat, out: W) -> Result<Self> {
        Ok(match format {
            OutputFormat::Text => MetadataWriter::Text(out),
            OutputFormat::Json => MetadataWriter::Json(out),
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(out);
                writer.write_record(["file", "name", "value"])?;
                MetadataWriter::Csv(writer)
            }
        })
    }

    pub fn write(&mut self, path: &Path, metadata: &ResultList) -> Result<()> {
        match self {
            MetadataWriter::Text(out) => {
                writeln!(out, "FILE: {}", path.display())?;
                for pair in metadata {
                    writeln!(out, "  {}", pair)?;
                }
                writeln!(out)?;
            }
            MetadataWriter::Json(out) => {
                let record = FileMetadata {
                    file: path.display().to_string(),
                    metadata,
                };
                serde_json::to_writer(&mut *out, &record)?;
                writeln!(out)?;
            }
            MetadataWriter::Csv(writer) => {
                let file = path.display().to_string();
                for pair in metadata {
                    let value = pair.value.to_string();
                    writer.write_record([file.as_str(), pair.name.as_str(), value.as_str()])?;
                }
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Result<()> {
        match self {
            MetadataWriter::Text(mut out) | MetadataWriter::Json(mut out) => out.flush()?,
            MetadataWriter::Csv(mut writer) => writer.flush()?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::MetadataPair;
    use crate::header::HeaderValue;

    fn sample() -> ResultList {
        ResultList::filtered(vec![
            MetadataPair::new("OBJECT", "M31, core"),
            MetadataPair::new("NAXIS1", HeaderValue::Integer(512)),
            MetadataPair::new("FILTER", HeaderValue::Absent),
            MetadataPair::new("CRVAL1", HeaderValue::Float(10.5)),
        ])
    }

    fn render(format: OutputFormat) -> String {
        let mut out = Vec::new();
        let mut writer = MetadataWriter::new(format, &mut out).unwrap();
        writer.write(Path::new("/a/b.fits"), &sample()).unwrap();
        writer.finish().unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_text_output() {
        assert_eq!(
            render(OutputFormat::Text),
            "FILE: /a/b.fits\n  OBJECT: M31, core\n  NAXIS1: 512\n  CRVAL1: 10.5\n\n"
        );
    }

    #[test]
    fn test_json_lines_output() {
        assert_eq!(
            render(OutputFormat::Json),
            "{\"file\":\"/a/b.fits\",\"metadata\":[\
             {\"name\":\"OBJECT\",\"value\":\"M31, core\"},\
             {\"name\":\"NAXIS1\",\"value\":512},\
             {\"name\":\"CRVAL1\",\"value\":10.5}]}\n"
        );
    }

    #[test]
    fn test_csv_output() {
        assert_eq!(
            render(OutputFormat::Csv),
            "file,name,value\n\
             /a/b.fits,OBJECT,\"M31, core\"\n\
             /a/b.fits,NAXIS1,512\n\
             /a/b.fits,CRVAL1,10.5\n"
        );
    }

    #[test]
    fn test_csv_header_written_once() {
        let mut out = Vec::new();
        let mut writer = MetadataWriter::new(OutputFormat::Csv, &mut out).unwrap();
        writer.write(Path::new("one.fits"), &sample()).unwrap();
        writer.write(Path::new("two.fits"), &ResultList::default()).unwrap();
        writer.finish().unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("file,name,value").count(), 1);
        assert_eq!(text.lines().count(), 4);
    }
}
