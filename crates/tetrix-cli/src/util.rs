use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::Context as _;
use serde::Serialize;
use tetrix_engine::EngineConfig;

/// Writes `value` as pretty-printed JSON to `path`, or to stdout if no path
/// is given.
pub fn write_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
{
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_pretty_json(BufWriter::new(file), value)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))
        }
        None => write_pretty_json(io::stdout().lock(), value)
            .context("Failed to write JSON to stdout"),
    }
}

fn write_pretty_json<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Loads an engine configuration, or the defaults if no path is given.
///
/// Fields missing from the file take their default values; the result is
/// validated before it is returned.
pub fn read_config_file(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let file = File::open(path)
        .with_context(|| format!("Failed to open engine config file: {}", path.display()))?;
    parse_config(BufReader::new(file))
        .with_context(|| format!("Invalid engine config file: {}", path.display()))
}

fn parse_config<R>(reader: R) -> anyhow::Result<EngineConfig>
where
    R: Read,
{
    let config: EngineConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use tetrix_engine::ConfigError;

    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config(r#"{ "columns": 12, "lines_per_level": 4 }"#.as_bytes()).unwrap();
        assert_eq!(config.columns, 12);
        assert_eq!(config.lines_per_level, 4);
        assert_eq!(config.rows, EngineConfig::default().rows);
    }

    #[test]
    fn test_parse_rejects_invalid_config() {
        let err = parse_config(r#"{ "initial_level": 0 }"#.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::ZeroInitialLevel)
        );
        assert!(parse_config("{ not json".as_bytes()).is_err());
    }

    #[test]
    fn test_missing_path_uses_defaults() {
        assert_eq!(read_config_file(None).unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_written_json_reads_back() {
        let mut buf = Vec::new();
        write_pretty_json(&mut buf, &EngineConfig::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("}\n"));
        assert_eq!(
            parse_config(text.as_bytes()).unwrap(),
            EngineConfig::default()
        );
    }
}
