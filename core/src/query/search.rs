use crate::task::TaskRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Description,
    Tags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub fields: Vec<SearchField>,
    pub ignore_case: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            fields: vec![SearchField::Description, SearchField::Tags],
            ignore_case: false,
        }
    }
}

impl SearchOptions {
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Restrict to `fields`; an empty list keeps the default (all fields).
    pub fn fields(mut self, fields: Vec<SearchField>) -> Self {
        if !fields.is_empty() {
            self.fields = fields;
        }
        self
    }
}

/// Substring match of `query` against the selected fields.
///
/// For tags, each tag is matched on its own, so a query never spans two tags.
pub fn search<'a, I>(records: I, query: &str, opts: &SearchOptions) -> Vec<&'a TaskRecord>
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    let needle = if opts.ignore_case {
        query.to_lowercase()
    } else {
        query.to_string()
    };
    records
        .into_iter()
        .filter(|r| matches(r, &needle, opts))
        .collect()
}

fn matches(record: &TaskRecord, needle: &str, opts: &SearchOptions) -> bool {
    let contains = |hay: &str| {
        if opts.ignore_case {
            hay.to_lowercase().contains(needle)
        } else {
            hay.contains(needle)
        }
    };
    opts.fields.iter().any(|field| match field {
        SearchField::Description => contains(record.description()),
        SearchField::Tags => record.tags().iter().any(|t| contains(t.as_str())),
    })
}
