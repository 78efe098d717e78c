use std::collections::HashMap;

use crate::config::LanguageConfig;

pub const UNKNOWN_NAME: &str = "Unknown";
pub const UNKNOWN_CODE: &str = "unk";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub name: String,
    pub code: String,
}

/// Class label -> human readable language
#[derive(Debug, Clone, Default)]
pub struct LanguageTable {
    entries: HashMap<i64, Language>,
}

impl LanguageTable {
    pub fn new(languages: &[LanguageConfig]) -> Self {
        let entries = languages
            .iter()
            .map(|lang| {
                (
                    lang.index,
                    Language {
                        name: lang.name.clone(),
                        code: lang.code.clone(),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Returns `Unknown`/`unk` for labels missing from the table
    pub fn lookup(&self, label: i64) -> Language {
        self.entries.get(&label).cloned().unwrap_or_else(|| Language {
            name: UNKNOWN_NAME.to_string(),
            code: UNKNOWN_CODE.to_string(),
        })
    }

    /// Labels the classifier can emit that have no entry, sorted
    pub fn unmapped(&self, classes: &[i64]) -> Vec<i64> {
        let mut missing: Vec<i64> = classes
            .iter()
            .copied()
            .filter(|label| !self.entries.contains_key(label))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_languages;

    #[test]
    fn test_default_table() {
        let table = LanguageTable::new(&default_languages());
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.lookup(0),
            Language {
                name: "English".to_string(),
                code: "en".to_string()
            }
        );
        assert_eq!(table.lookup(1).code, "ru");
        assert_eq!(table.lookup(2).name, "Spanish");
    }

    #[test]
    fn test_unmapped_label_is_unknown() {
        let table = LanguageTable::new(&default_languages());
        let lang = table.lookup(42);
        assert_eq!(lang.name, UNKNOWN_NAME);
        assert_eq!(lang.code, UNKNOWN_CODE);
    }

    #[test]
    fn test_unmapped_reports_missing_classes() {
        let table = LanguageTable::new(&default_languages());
        assert_eq!(table.unmapped(&[0, 1, 2, 5, 3, 5]), vec![3, 5]);
        assert!(table.unmapped(&[0, 2]).is_empty());
    }
}
