//! Entry files: listing, reading, and traversal.

use std::error::Error;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::model::Entry;
use crate::value;

use super::{ENTRY_EXTENSION, Journal, Result, StorageError};

/// What a traversal visitor wants to happen next.
#[derive(Debug)]
pub enum Visit {
    /// Move on to the next entry.
    Continue,
    /// End the traversal now; it completes successfully.
    Stop,
    /// End the traversal now with this error.
    Fail(Box<dyn Error + Send + Sync>),
}

impl Visit {
    pub fn fail(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::Fail(err.into())
    }
}

/// An entry file found while listing the entries directory.
struct EntryFile {
    identity: String,
    file_name: String,
    path: PathBuf,
}

impl Journal {
    /// Lists the identities of all entry files, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the entries directory does not
    /// exist, or [`StorageError::Io`] if it cannot be listed.
    pub fn list_entry_identities(&self) -> Result<Vec<String>> {
        Ok(self
            .list_entry_files()?
            .into_iter()
            .map(|f| f.identity)
            .collect())
    }

    /// Reads and decodes the entry with the given identity.
    ///
    /// An entry document without its own `UUID` key takes the identity it
    /// was looked up by.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if there is no such entry file,
    /// [`StorageError::Format`] or [`StorageError::Decode`] if its contents
    /// are not a valid entry, and [`StorageError::Io`] otherwise.
    pub fn read_entry(&self, identity: &str) -> Result<Entry> {
        self.read_entry_at(&self.entry_path(identity), identity)
    }

    /// Returns filesystem metadata for the entry file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if there is no such entry file.
    pub fn entry_stat(&self, identity: &str) -> Result<fs::Metadata> {
        let path = self.entry_path(identity);
        fs::metadata(&path).map_err(|e| StorageError::from_io(&path, e))
    }

    /// Reads every entry in turn and hands the result to `visit`.
    ///
    /// Entries are visited one at a time in identity order. Read and decode
    /// failures are passed to `visit` rather than ending the traversal, so an
    /// entry that vanished after listing shows up as a single
    /// [`StorageError::NotFound`]. The visitor decides what happens next:
    /// [`Visit::Stop`] ends the traversal successfully, and [`Visit::Fail`]
    /// ends it with a [`StorageError::Visitor`] naming the file.
    ///
    /// # Errors
    ///
    /// Returns the listing error, unwrapped, if the entries directory cannot
    /// be listed; no entry is visited in that case. Otherwise returns the
    /// visitor's failure, if any.
    pub fn for_each<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(Result<Entry>) -> Visit,
    {
        let files = self.list_entry_files()?;
        debug!(count = files.len(), root = %self.root.display(), "traversing entries");

        for file in files {
            debug!(file = %file.file_name, "reading entry");
            let entry = self.read_entry_at(&file.path, &file.identity);

            match visit(entry) {
                Visit::Continue => {}
                Visit::Stop => {
                    debug!(file = %file.file_name, "traversal stopped by visitor");
                    return Ok(());
                }
                Visit::Fail(source) => {
                    debug!(file = %file.file_name, error = %source, "traversal failed");
                    return Err(StorageError::Visitor {
                        file: file.file_name,
                        source,
                    });
                }
            }
        }
        Ok(())
    }

    fn list_entry_files(&self) -> Result<Vec<EntryFile>> {
        let dir = self.entries_dir();
        let read_dir = fs::read_dir(&dir).map_err(|e| StorageError::from_io(&dir, e))?;

        let mut files = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry.map_err(|e| StorageError::from_io(&dir, e))?;
            let path = dir_entry.path();
            if !path.is_file() {
                trace!(path = %path.display(), "skipping non-file");
                continue;
            }
            let Some(identity) = entry_identity(&path) else {
                trace!(path = %path.display(), "skipping non-entry file");
                continue;
            };
            files.push(EntryFile {
                identity: identity.to_string(),
                file_name: dir_entry.file_name().to_string_lossy().into_owned(),
                path,
            });
        }

        // Listing order is filesystem-dependent; sort for determinism.
        files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(files)
    }

    fn read_entry_at(&self, path: &Path, identity: &str) -> Result<Entry> {
        let file = fs::File::open(path).map_err(|e| StorageError::from_io(path, e))?;
        let root = value::from_reader(BufReader::new(file)).map_err(|source| {
            StorageError::Format {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let mut entry = self
            .decoder
            .decode(root)
            .map_err(|source| StorageError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        if entry.id.is_empty() {
            entry.id = identity.to_string();
        }
        Ok(entry)
    }
}

/// The identity named by an entry file path, or `None` for other files.
fn entry_identity(path: &Path) -> Option<&str> {
    let extension = path.extension()?.to_str()?;
    if !extension.eq_ignore_ascii_case(ENTRY_EXTENSION) {
        return None;
    }
    path.file_stem()?.to_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fmt;

    use crate::decode::{DecodeError, UnknownFields};
    use crate::storage::fixtures::*;

    #[derive(Debug)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("boom")
        }
    }

    impl Error for Boom {}

    #[test]
    fn lists_identities_sorted() {
        let dir = default_store();
        let journal = Journal::new(dir.path());

        let ids = journal.list_entry_identities().unwrap();

        assert_eq!(ids, [FIRST, SECOND]);
    }

    #[test]
    fn listing_skips_other_files_and_directories() {
        let dir = default_store();
        let entries = dir.path().join("entries");
        fs::write(entries.join("notes.txt"), "not an entry").unwrap();
        fs::write(entries.join("README"), "no extension").unwrap();
        fs::create_dir(entries.join("NESTED.doentry")).unwrap();
        let journal = Journal::new(dir.path());

        let ids = journal.list_entry_identities().unwrap();

        assert_eq!(ids, [FIRST, SECOND]);
    }

    #[test]
    fn listing_matches_extension_case_insensitively() {
        let dir = empty_store();
        fs::write(
            dir.path().join("entries").join("ABCDEF.DOENTRY"),
            entry_document("ABCDEF", "shouting"),
        )
        .unwrap();
        let journal = Journal::new(dir.path());

        assert_eq!(journal.list_entry_identities().unwrap(), ["ABCDEF"]);
    }

    #[test]
    fn listing_missing_entries_dir_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let journal = Journal::new(dir.path());

        let err = journal.list_entry_identities().unwrap_err();

        assert!(err.is_not_found(), "{err}");
    }

    #[test]
    fn listing_entries_path_that_is_a_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("entries"), "not a directory").unwrap();
        let journal = Journal::new(dir.path());

        let err = journal.list_entry_identities().unwrap_err();

        assert!(matches!(err, StorageError::Io { .. }), "{err}");
    }

    #[test]
    fn reads_entry_by_identity() {
        let dir = default_store();
        let journal = Journal::new(dir.path());

        let entry = journal.read_entry(SECOND).unwrap();

        assert_eq!(entry.identity(), SECOND);
        assert_eq!(entry.text, "second entry");
        assert_eq!(entry.tags, ["journal"]);
        assert_eq!(
            entry.creation_date,
            Some("2014-09-24T01:52:11Z".parse().unwrap())
        );
    }

    #[test]
    fn reads_full_entry_document() {
        let dir = empty_store();
        let body = "
            <key>UUID</key><string>FF755C6D7D9B4A5FBC4E41C07D622C65</string>
            <key>Activity</key><string>Automotive</string>
            <key>Step Count</key><integer>1043</integer>
            <key>Time Zone</key><string>America/Chicago</string>
            <key>Location</key>
            <dict>
                <key>Latitude</key><real>39.988470999551925</real>
                <key>Longitude</key><real>-87.8764692974257</real>
                <key>Region</key>
                <dict>
                    <key>Center</key>
                    <dict>
                        <key>Latitude</key><real>39.98898599897538</real>
                        <key>Longitude</key><real>-87.876626999999985</real>
                    </dict>
                    <key>Radius</key><real>70.891240772618431</real>
                </dict>
            </dict>
            <key>Weather</key>
            <dict>
                <key>Pressure MB</key><integer>1017</integer>
                <key>Relative Humidity</key><real>47.5</real>
                <key>Wind Bearing</key><integer>80</integer>
                <key>Wind Chill Celsius</key><integer>-3</integer>
                <key>Sunrise Date</key><date>2014-09-23T12:20:49Z</date>
            </dict>";
        write_entry(dir.path(), SECOND, &document(body));
        let journal = Journal::new(dir.path());

        let entry = journal.read_entry(SECOND).unwrap();
        let location = entry.location.unwrap();
        let weather = entry.weather.unwrap();

        assert_eq!(entry.activity, "Automotive");
        assert_eq!(entry.step_count, 1043);
        assert_eq!(entry.time_zone, "America/Chicago");
        assert_eq!(location.coordinate.latitude, 39.988_470_999_551_925);
        assert_eq!(location.region.unwrap().radius, 70.891_240_772_618_431);
        assert_eq!(weather.pressure_mb, 1017.0);
        assert_eq!(weather.relative_humidity, 47.5);
        assert_eq!(weather.wind_bearing, 80);
        assert_eq!(weather.wind_chill_celsius, -3);
        assert_eq!(
            weather.sunrise_date,
            Some("2014-09-23T12:20:49Z".parse().unwrap())
        );
    }

    #[test]
    fn identity_falls_back_to_file_name() {
        let dir = empty_store();
        write_entry(
            dir.path(),
            FIRST,
            &document("<key>Entry Text</key><string>anonymous</string>"),
        );
        let journal = Journal::new(dir.path());

        let entry = journal.read_entry(FIRST).unwrap();

        assert_eq!(entry.identity(), FIRST);
    }

    #[test]
    fn read_missing_entry_is_not_found() {
        let dir = default_store();
        let journal = Journal::new(dir.path());

        let err = journal.read_entry("bad uuid").unwrap_err();

        assert!(err.is_not_found(), "{err}");
    }

    #[test]
    fn read_unparseable_entry_is_format_error() {
        let dir = empty_store();
        write_entry(dir.path(), FIRST, "<plist><dict><key>Truncated</key>");
        let journal = Journal::new(dir.path());

        let err = journal.read_entry(FIRST).unwrap_err();

        assert!(matches!(err, StorageError::Format { .. }), "{err}");
        assert!(err.is_decode());
    }

    #[test]
    fn read_entry_with_unknown_field_is_decode_error() {
        let dir = empty_store();
        write_entry(
            dir.path(),
            FIRST,
            &document("<key>Mood</key><string>happy</string>"),
        );
        let journal = Journal::new(dir.path());

        let err = journal.read_entry(FIRST).unwrap_err();

        assert!(matches!(
            err,
            StorageError::Decode {
                source: DecodeError::UnknownField { .. },
                ..
            }
        ));
    }

    #[test]
    fn ignore_policy_reads_entry_with_unknown_field() {
        let dir = empty_store();
        write_entry(
            dir.path(),
            FIRST,
            &document("<key>Mood</key><string>happy</string><key>Starred</key><true/>"),
        );
        let journal = Journal::new(dir.path()).with_unknown_fields(UnknownFields::Ignore);

        let entry = journal.read_entry(FIRST).unwrap();

        assert!(entry.starred);
    }

    #[test]
    fn stat_entry() {
        let dir = default_store();
        let journal = Journal::new(dir.path());

        let meta = journal.entry_stat(FIRST).unwrap();

        assert!(meta.is_file());
        assert!(meta.len() > 0);
    }

    #[test]
    fn stat_missing_entry_is_not_found() {
        let dir = default_store();
        let journal = Journal::new(dir.path());

        assert!(journal.entry_stat("missing uuid").unwrap_err().is_not_found());
    }

    #[test]
    fn for_each_visits_all_entries_in_order() {
        let dir = default_store();
        let journal = Journal::new(dir.path());
        let mut seen = Vec::new();

        journal
            .for_each(|entry| {
                seen.push(entry.unwrap().identity().to_string());
                Visit::Continue
            })
            .unwrap();

        assert_eq!(seen, [FIRST, SECOND]);
    }

    #[test]
    fn for_each_stops_when_asked() {
        let dir = default_store();
        let journal = Journal::new(dir.path());
        let mut count = 0;

        let result = journal.for_each(|_| {
            count += 1;
            Visit::Stop
        });

        assert!(result.is_ok());
        assert_eq!(count, 1);
    }

    #[test]
    fn for_each_bubbles_visitor_error_with_file_name() {
        let dir = default_store();
        let journal = Journal::new(dir.path());
        let mut count = 0;

        let err = journal
            .for_each(|_| {
                count += 1;
                Visit::fail(Boom)
            })
            .unwrap_err();

        assert_eq!(count, 1);
        let message = err.to_string();
        assert!(message.contains("boom"), "{message}");
        assert!(message.contains(&format!("{FIRST}.doentry")), "{message}");
    }

    #[test]
    fn for_each_visitor_error_is_recoverable() {
        let dir = default_store();
        let journal = Journal::new(dir.path());

        let err = journal.for_each(|_| Visit::fail(Boom)).unwrap_err();

        let (file, source) = match err {
            StorageError::Visitor { file, source } => (file, source),
            other => panic!("expected visitor error, got {other}"),
        };
        assert_eq!(file, format!("{FIRST}.doentry"));
        assert!(source.downcast_ref::<Boom>().is_some());
    }

    #[test]
    fn for_each_escalates_entry_errors_when_visitor_returns_them() {
        let dir = default_store();
        write_entry(
            dir.path(),
            FIRST,
            &document("<key>Starred</key><string>yes</string>"),
        );
        let journal = Journal::new(dir.path());

        let err = journal
            .for_each(|entry| match entry {
                Ok(_) => Visit::Continue,
                Err(e) => Visit::fail(e),
            })
            .unwrap_err();

        let source = match err {
            StorageError::Visitor { source, .. } => source,
            other => panic!("expected visitor error, got {other}"),
        };
        let inner = source.downcast_ref::<StorageError>().unwrap();
        assert!(inner.is_decode());
    }

    #[test]
    fn for_each_passes_entry_errors_and_continues() {
        let dir = default_store();
        write_entry(dir.path(), FIRST, "<plist><dict>");
        let journal = Journal::new(dir.path());
        let mut ok = Vec::new();
        let mut failed = 0;

        journal
            .for_each(|entry| {
                match entry {
                    Ok(e) => ok.push(e.identity().to_string()),
                    Err(_) => failed += 1,
                }
                Visit::Continue
            })
            .unwrap();

        assert_eq!(ok, [SECOND]);
        assert_eq!(failed, 1);
    }

    #[test]
    fn for_each_empty_entries_dir() {
        let dir = empty_store();
        let journal = Journal::new(dir.path());
        let mut count = 0;

        journal
            .for_each(|_| {
                count += 1;
                Visit::Continue
            })
            .unwrap();

        assert_eq!(count, 0);
    }

    #[test]
    fn for_each_missing_entries_dir_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let journal = Journal::new(dir.path());
        let mut count = 0;

        let err = journal
            .for_each(|_| {
                count += 1;
                Visit::Continue
            })
            .unwrap_err();

        assert!(err.is_not_found(), "{err}");
        assert_eq!(count, 0);
    }
}
