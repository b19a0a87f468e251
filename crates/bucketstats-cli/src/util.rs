use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use bucketstats::Histogram;
use serde::{Serialize, de::DeserializeOwned};

/// Destination of a command's results: stdout, or the `--output` file.
pub struct Output {
    writer: BufWriter<Box<dyn Write>>,
    path: Option<PathBuf>,
}

impl Output {
    pub fn create(path: Option<&Path>) -> anyhow::Result<Self> {
        let writer: Box<dyn Write> = match path {
            Some(path) => Box::new(
                File::create(path)
                    .with_context(|| format!("Cannot create output file {}", path.display()))?,
            ),
            None => Box::new(io::stdout().lock()),
        };
        Ok(Self {
            writer: BufWriter::new(writer),
            path: path.map(Path::to_path_buf),
        })
    }

    fn destination(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "stdout".to_owned(), |p| p.display().to_string())
    }

    /// Renders the results with `render`, then flushes.
    pub fn emit<F>(mut self, render: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut BufWriter<Box<dyn Write>>) -> io::Result<()>,
    {
        render(&mut self.writer)
            .and_then(|()| self.writer.flush())
            .with_context(|| format!("Cannot write results to {}", self.destination()))?;
        if let Some(path) = &self.path {
            eprintln!("Results saved to: {}", path.display());
        }
        Ok(())
    }

    pub fn emit_json<T>(self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        self.emit(|w| {
            serde_json::to_writer_pretty(&mut *w, value)?;
            writeln!(w)
        })
    }
}

fn read_input<T>(what: &str, path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    eprintln!("Loading {what} from {}...", path.display());
    let file =
        File::open(path).with_context(|| format!("Cannot open {what} file {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid {what} in {}", path.display()))
}

/// Read and validate a histogram from a JSON file
///
/// Accepts every JSON layout understood by [`Histogram`]'s deserializer.
pub fn read_histogram_file<P>(path: P) -> anyhow::Result<Histogram>
where
    P: AsRef<Path>,
{
    let hist: Histogram = read_input("histogram", path.as_ref())?;
    eprintln!("Loaded {} bins (total weight {})", hist.len(), hist.total());
    Ok(hist)
}

/// Read survival observations from a JSON file
///
/// The file holds an array of `[time, is_censored]` pairs.
pub fn read_observations_file<P>(path: P) -> anyhow::Result<Vec<(usize, bool)>>
where
    P: AsRef<Path>,
{
    read_input("observations", path.as_ref())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::NamedTempFile;

    use super::*;

    fn json_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    mod input {
        use super::*;

        #[test]
        fn test_read_histogram_file() {
            let file = json_file(r#"{"1": 2, "2": 5}"#);
            let hist = read_histogram_file(file.path()).unwrap();
            assert_eq!(hist.support(), &[1.0, 2.0]);
            assert_eq!(hist.weights(), &[2.0, 5.0]);
        }

        #[test]
        fn test_read_histogram_file_reports_validation_error() {
            let file = json_file("[[2, 1], [1, 1]]");
            let err = read_histogram_file(file.path()).unwrap_err();
            let message = format!("{err:#}");
            assert!(message.contains("Invalid histogram in"));
            assert!(message.contains("monotonic"));
        }

        #[test]
        fn test_read_observations_file() {
            let file = json_file("[[3, false], [5, true]]");
            let observations = read_observations_file(file.path()).unwrap();
            assert_eq!(observations, vec![(3, false), (5, true)]);
        }

        #[test]
        fn test_missing_file() {
            let dir = tempfile::tempdir().unwrap();
            let err = read_histogram_file(dir.path().join("absent.json")).unwrap_err();
            assert!(err.to_string().contains("Cannot open histogram file"));
        }
    }

    mod output {
        use super::*;

        #[test]
        fn test_emit_json_to_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("summary.json");
            Output::create(Some(path.as_path()))
                .unwrap()
                .emit_json(&[1.5, 2.0])
                .unwrap();

            let written: Vec<f64> =
                serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(written, vec![1.5, 2.0]);
        }

        #[test]
        fn test_emit_renders_text() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("table.txt");
            Output::create(Some(path.as_path()))
                .unwrap()
                .emit(|w| writeln!(w, "hello"))
                .unwrap();
            assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
        }

        #[test]
        fn test_create_in_missing_directory_fails() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("absent").join("out.json");
            let Err(err) = Output::create(Some(path.as_path())) else {
                panic!("expected an error");
            };
            assert!(err.to_string().contains("Cannot create output file"));
        }
    }
}
