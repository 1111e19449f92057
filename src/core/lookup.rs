use crate::config::toml_config::{ChainSettings, LookupTable};
use crate::domain::model::{ResolvedQuery, ScheduleQuery, Selector};
use crate::domain::ports::Storage;
use crate::utils::error::{LookupKind, Result, ShowtimeError};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Scans one CSV for the first row whose name column equals `target` and
/// returns its code. Rows with a blank code count as "not found", the same
/// as a missing row.
pub fn find_code(
    data: &[u8],
    source_name: &str,
    table: &LookupTable,
    target: &str,
) -> Result<Option<String>> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);

    let headers = reader.headers()?.clone();
    let column_index = |column: &str| {
        headers
            .iter()
            .position(|header| header.trim() == column)
            .ok_or_else(|| ShowtimeError::LookupColumnMissing {
                path: source_name.to_string(),
                column: column.to_string(),
            })
    };

    let name_index = column_index(&table.name_column)?;
    let code_indexes = table
        .code_columns
        .iter()
        .map(|column| column_index(column))
        .collect::<Result<Vec<_>>>()?;

    let target = target.trim();
    for record in reader.records() {
        let record = record?;
        if record.get(name_index).map(str::trim) != Some(target) {
            continue;
        }

        let parts: Vec<&str> = code_indexes
            .iter()
            .map(|&index| record.get(index).unwrap_or("").trim())
            .collect();
        if parts.iter().any(|part| part.is_empty()) {
            tracing::warn!("'{}' in {} has an empty code", target, source_name);
            return Ok(None);
        }
        return Ok(Some(parts.join("|")));
    }

    Ok(None)
}

/// Resolves one selector against a lookup table backed by `Storage`.
pub struct CodeLookup<'a, S: Storage> {
    storage: &'a S,
    table: &'a LookupTable,
    kind: LookupKind,
}

impl<'a, S: Storage> CodeLookup<'a, S> {
    pub fn new(storage: &'a S, table: &'a LookupTable, kind: LookupKind) -> Self {
        Self {
            storage,
            table,
            kind,
        }
    }

    pub async fn resolve(&self, selector: &Selector) -> Result<String> {
        let name = match selector {
            Selector::Code(code) => return Ok(code.clone()),
            Selector::Name(name) => name,
        };

        for file in &self.table.files {
            let data = self.storage.read_file(file).await?;
            if let Some(code) = find_code(&data, file, self.table, name)? {
                tracing::debug!("Resolved {} '{}' to {} via {}", self.kind, name, code, file);
                return Ok(code);
            }
        }

        Err(ShowtimeError::CodeNotFound {
            kind: self.kind,
            name: name.clone(),
        })
    }
}

/// Turns the user's theater/movie selectors into the codes a chain expects.
/// Both lookups run before failing so a run reports every unknown name.
pub async fn resolve_query<S: Storage>(
    storage: &S,
    settings: &ChainSettings,
    query: &ScheduleQuery,
) -> Result<ResolvedQuery> {
    let theater = CodeLookup::new(storage, &settings.theater, LookupKind::Theater)
        .resolve(&query.theater)
        .await;
    let movie = CodeLookup::new(storage, &settings.movie, LookupKind::Movie)
        .resolve(&query.movie)
        .await;

    let (theater_code, movie_code) = match (theater, movie) {
        (Ok(theater_code), Ok(movie_code)) => (theater_code, movie_code),
        (
            Err(ShowtimeError::CodeNotFound { name: theater, .. }),
            Err(ShowtimeError::CodeNotFound { name: movie, .. }),
        ) => return Err(ShowtimeError::CodesNotFound { theater, movie }),
        (Err(e), _) | (_, Err(e)) => return Err(e),
    };

    Ok(ResolvedQuery {
        theater_code,
        movie_code,
        theater_label: query.theater.as_str().to_string(),
        movie_label: query.movie.as_str().to_string(),
        date: query.date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockStorage {
        files: HashMap<String, Vec<u8>>,
        reads: Arc<Mutex<Vec<String>>>,
    }

    impl MockStorage {
        fn with_file(mut self, path: &str, content: &str) -> Self {
            self.files.insert(path.to_string(), content.as_bytes().to_vec());
            self
        }

        fn reads(&self) -> Vec<String> {
            self.reads.lock().unwrap().clone()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.reads.lock().unwrap().push(path.to_string());
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| ShowtimeError::LookupFileMissing {
                    path: path.to_string(),
                })
        }
    }

    fn megabox_theaters() -> LookupTable {
        ChainSettings::megabox_defaults().theater
    }

    #[test]
    fn test_find_code_first_match_wins() {
        let csv = "brchNm,brchNo\n코엑스,1351\n대전중앙로,0023\n대전중앙로,9999\n";
        let code = find_code(csv.as_bytes(), "megabox_theater.csv", &megabox_theaters(), "대전중앙로")
            .unwrap();
        assert_eq!(code.as_deref(), Some("0023"));
    }

    #[test]
    fn test_find_code_ignores_bom_and_whitespace() {
        let csv = "\u{feff}brchNm,brchNo\n  코엑스 , 1351 \n";
        let code =
            find_code(csv.as_bytes(), "megabox_theater.csv", &megabox_theaters(), "코엑스").unwrap();
        assert_eq!(code.as_deref(), Some("1351"));
    }

    #[test]
    fn test_find_code_joins_multiple_columns() {
        let table = ChainSettings::lotte_defaults().theater;
        let csv = "cinemaNameKR,divisionCode,detailDivisionCode,cinemaID\n대전센트럴,1,0003,4008\n";
        let code = find_code(csv.as_bytes(), "lottecinema_theater.csv", &table, "대전센트럴").unwrap();
        assert_eq!(code.as_deref(), Some("1|0003|4008"));
    }

    #[test]
    fn test_find_code_missing_name_returns_none() {
        let csv = "brchNm,brchNo\n코엑스,1351\n";
        let code =
            find_code(csv.as_bytes(), "megabox_theater.csv", &megabox_theaters(), "강남").unwrap();
        assert_eq!(code, None);
    }

    #[test]
    fn test_find_code_blank_code_is_not_found() {
        let csv = "brchNm,brchNo\n코엑스,\n";
        let code =
            find_code(csv.as_bytes(), "megabox_theater.csv", &megabox_theaters(), "코엑스").unwrap();
        assert_eq!(code, None);
    }

    #[test]
    fn test_find_code_missing_column() {
        let csv = "name,no\n코엑스,1351\n";
        let err = find_code(csv.as_bytes(), "megabox_theater.csv", &megabox_theaters(), "코엑스")
            .unwrap_err();
        match err {
            ShowtimeError::LookupColumnMissing { path, column } => {
                assert_eq!(path, "megabox_theater.csv");
                assert_eq!(column, "brchNm");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_lookup_searches_files_in_order() {
        let storage = MockStorage::default()
            .with_file("lottecinema_movie_now.csv", "movieNameKR,movieNo\n아바타,23001\n")
            .with_file(
                "lottecinema_movie_upcoming.csv",
                "movieNameKR,movieNo\n만약에 우리,23663\n",
            );
        let table = ChainSettings::lotte_defaults().movie;
        let lookup = CodeLookup::new(&storage, &table, LookupKind::Movie);

        let code = lookup
            .resolve(&Selector::Name("만약에 우리".to_string()))
            .await
            .unwrap();
        assert_eq!(code, "23663");
        assert_eq!(
            storage.reads(),
            vec!["lottecinema_movie_now.csv", "lottecinema_movie_upcoming.csv"]
        );
    }

    #[tokio::test]
    async fn test_lookup_code_selector_skips_storage() {
        let storage = MockStorage::default();
        let table = megabox_theaters();
        let lookup = CodeLookup::new(&storage, &table, LookupKind::Theater);

        let code = lookup.resolve(&Selector::Code("1351".to_string())).await.unwrap();
        assert_eq!(code, "1351");
        assert!(storage.reads().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let storage = MockStorage::default().with_file("megabox_theater.csv", "brchNm,brchNo\n");
        let table = megabox_theaters();
        let lookup = CodeLookup::new(&storage, &table, LookupKind::Theater);

        let err = lookup
            .resolve(&Selector::Name("강남".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShowtimeError::CodeNotFound { kind: LookupKind::Theater, ref name } if name == "강남"
        ));
    }

    #[tokio::test]
    async fn test_resolve_query_reports_both_missing_names() {
        let storage = MockStorage::default()
            .with_file("megabox_theater.csv", "brchNm,brchNo\n코엑스,1351\n")
            .with_file("megabox_movie.csv", "movieNm,movieNo\n만약에 우리,25104500\n");
        let query = ScheduleQuery {
            theater: Selector::Name("강남".to_string()),
            movie: Selector::Name("없는 영화".to_string()),
            date: NaiveDate::from_ymd_opt(2026, 1, 14).unwrap(),
        };

        let err = resolve_query(&storage, &ChainSettings::megabox_defaults(), &query)
            .await
            .unwrap_err();

        match err {
            ShowtimeError::CodesNotFound { theater, movie } => {
                assert_eq!(theater, "강남");
                assert_eq!(movie, "없는 영화");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(storage.reads(), vec!["megabox_theater.csv", "megabox_movie.csv"]);
    }

    #[tokio::test]
    async fn test_resolve_query_single_missing_name() {
        let storage = MockStorage::default()
            .with_file("megabox_theater.csv", "brchNm,brchNo\n코엑스,1351\n")
            .with_file("megabox_movie.csv", "movieNm,movieNo\n만약에 우리,25104500\n");
        let query = ScheduleQuery {
            theater: Selector::Name("강남".to_string()),
            movie: Selector::Name("만약에 우리".to_string()),
            date: NaiveDate::from_ymd_opt(2026, 1, 14).unwrap(),
        };

        let err = resolve_query(&storage, &ChainSettings::megabox_defaults(), &query)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ShowtimeError::CodeNotFound { kind: LookupKind::Theater, .. }
        ));
    }

    #[tokio::test]
    async fn test_resolve_query_keeps_user_labels() {
        let storage = MockStorage::default()
            .with_file("megabox_theater.csv", "brchNm,brchNo\n대전중앙로,0023\n")
            .with_file("megabox_movie.csv", "movieNm,movieNo\n만약에 우리,25104500\n");
        let query = ScheduleQuery {
            theater: Selector::Name("대전중앙로".to_string()),
            movie: Selector::Name("만약에 우리".to_string()),
            date: NaiveDate::from_ymd_opt(2026, 1, 14).unwrap(),
        };

        let resolved = resolve_query(&storage, &ChainSettings::megabox_defaults(), &query)
            .await
            .unwrap();

        assert_eq!(resolved.theater_code, "0023");
        assert_eq!(resolved.movie_code, "25104500");
        assert_eq!(resolved.theater_label, "대전중앙로");
        assert_eq!(resolved.movie_label, "만약에 우리");
    }
}
