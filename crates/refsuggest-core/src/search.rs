// crates/refsuggest-core/src/search.rs

//! # Fuzzy Matching
//!
//! Scores records against a query and orders them:
//!
//! 1. keep records whose best field score is within `threshold`;
//! 2. records with a field that starts with the query (case-insensitive) go
//!    first, everything else after, each group in score order;
//! 3. truncate to the requested limit.
//!
//! The score of a field is approximate-substring based: the fewest edits
//! needed to find the query somewhere in the field, relative to the query
//! length, plus a penalty for how far into the field the match starts
//! (`start / distance`). `0.0` is a perfect match at position 0.

use crate::locale::CountryScope;
use crate::text::{fold_key, normalize};
use crate::traits::ReferenceRecord;
use std::cmp::Ordering;

pub const DEFAULT_THRESHOLD: f64 = 0.3;
pub const DEFAULT_DISTANCE: usize = 100;
pub const DEFAULT_LIMIT: usize = 8;

/// Matcher configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOptions {
    /// Record fields to score. Empty means the record kind's defaults.
    pub fields: Vec<String>,
    /// Maximum accepted score, `0.0..=1.0`.
    pub threshold: f64,
    pub case_sensitive: bool,
    /// How quickly a late match start is penalized.
    pub distance: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            threshold: DEFAULT_THRESHOLD,
            case_sensitive: false,
            distance: DEFAULT_DISTANCE,
        }
    }
}

impl MatchOptions {
    pub fn with_fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    pub fn with_distance(mut self, distance: usize) -> Self {
        self.distance = distance;
        self
    }
}

/// One ranked result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<'a, R> {
    pub record: &'a R,
    pub score: f64,
    /// A matched field starts with the query.
    pub prefix: bool,
}

/// Best score of a record across its searched fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMatch {
    pub score: f64,
    pub prefix: bool,
}

struct Query {
    chars: Vec<char>,
    folded: String,
}

#[derive(Debug, Clone, Default)]
pub struct FuzzyMatcher {
    options: MatchOptions,
}

impl FuzzyMatcher {
    pub fn new(options: MatchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Score one piece of text. `None` if it does not meet the threshold or
    /// the query is blank.
    pub fn score_text(&self, text: &str, query: &str) -> Option<f64> {
        let q = self.prepare(query)?;
        let t: Vec<char> = normalize(text, self.options.case_sensitive).chars().collect();
        self.score_chars(&t, &q.chars)
    }

    /// Best match of `record` against `query`, `None` if no field qualifies.
    pub fn score<R: ReferenceRecord>(&self, record: &R, query: &str) -> Option<FieldMatch> {
        let q = self.prepare(query)?;
        self.score_prepared(record, &q)
    }

    /// Rank records against `query`, at most `limit` of them.
    ///
    /// A blank query yields nothing.
    pub fn rank<'a, R, I>(&self, dataset: I, query: &str, limit: usize) -> Vec<Hit<'a, R>>
    where
        R: ReferenceRecord,
        I: IntoIterator<Item = &'a R>,
    {
        let Some(q) = self.prepare(query) else {
            return Vec::new();
        };
        if limit == 0 {
            return Vec::new();
        }

        let mut hits: Vec<Hit<'a, R>> = dataset
            .into_iter()
            .filter_map(|record| {
                self.score_prepared(record, &q).map(|m| Hit {
                    record,
                    score: m.score,
                    prefix: m.prefix,
                })
            })
            .collect();

        // Stable: equal scores keep dataset order.
        hits.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));

        let (mut ordered, others): (Vec<_>, Vec<_>) = hits.into_iter().partition(|h| h.prefix);
        ordered.extend(others);
        ordered.truncate(limit);
        ordered
    }

    /// Ranked records, cloned out of `dataset`.
    pub fn search<R: ReferenceRecord>(&self, dataset: &[R], query: &str, limit: usize) -> Vec<R> {
        self.search_scoped(dataset, query, limit, None)
    }

    /// Like [`FuzzyMatcher::search`], restricted to `scope` first when the
    /// record kind is country scoped.
    pub fn search_scoped<R: ReferenceRecord>(
        &self,
        dataset: &[R],
        query: &str,
        limit: usize,
        scope: Option<&CountryScope>,
    ) -> Vec<R> {
        let admitted = dataset.iter().filter(|r| admits(*r, scope));
        self.rank(admitted, query, limit)
            .into_iter()
            .map(|h| h.record.clone())
            .collect()
    }

    fn prepare(&self, query: &str) -> Option<Query> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Query {
            chars: normalize(trimmed, self.options.case_sensitive).chars().collect(),
            folded: fold_key(trimmed),
        })
    }

    fn score_prepared<R: ReferenceRecord>(&self, record: &R, q: &Query) -> Option<FieldMatch> {
        let mut best: Option<FieldMatch> = None;

        let use_defaults = self.options.fields.is_empty();
        let fields = self
            .options
            .fields
            .iter()
            .map(String::as_str)
            .chain(R::DEFAULT_FIELDS.iter().copied().filter(|_| use_defaults));

        for name in fields {
            let Some(text) = record.field(name) else {
                continue;
            };
            let t: Vec<char> = normalize(text, self.options.case_sensitive).chars().collect();
            let Some(score) = self.score_chars(&t, &q.chars) else {
                continue;
            };
            let prefix = fold_key(text).starts_with(&q.folded);

            best = Some(match best {
                None => FieldMatch { score, prefix },
                Some(b) => FieldMatch {
                    score: b.score.min(score),
                    prefix: b.prefix || prefix,
                },
            });
        }
        best
    }

    fn score_chars(&self, text: &[char], pattern: &[char]) -> Option<f64> {
        approx_score(text, pattern, self.options.threshold, self.options.distance)
            .filter(|s| *s <= self.options.threshold)
    }
}

fn admits<R: ReferenceRecord>(record: &R, scope: Option<&CountryScope>) -> bool {
    if !R::COUNTRY_SCOPED {
        return true;
    }
    scope.map_or(true, |s| s.admits(record.country()))
}

#[derive(Clone, Copy)]
struct Cell {
    cost: usize,
    start: usize,
}

impl Cell {
    fn better(self, other: Cell) -> Cell {
        if (other.cost, other.start) < (self.cost, self.start) {
            other
        } else {
            self
        }
    }
}

/// Approximate substring score of `pattern` in `text`.
///
/// Sellers' edit-distance recurrence with the match start carried along, so
/// both the error count and the start position feed the score.
fn approx_score(text: &[char], pattern: &[char], threshold: f64, distance: usize) -> Option<f64> {
    let m = pattern.len();
    if m == 0 {
        return None;
    }
    let max_errors = (threshold * m as f64).floor() as usize;
    let max_start = (threshold * distance as f64).floor() as usize;
    // Anything past this point cannot be part of an acceptable match.
    let window = text.len().min(max_start + m + max_errors);
    let text = &text[..window];
    let n = text.len();

    let mut prev: Vec<Cell> = (0..=n).map(|j| Cell { cost: 0, start: j }).collect();
    let mut cur: Vec<Cell> = vec![Cell { cost: 0, start: 0 }; n + 1];

    for i in 1..=m {
        cur[0] = Cell { cost: i, start: 0 };
        for j in 1..=n {
            let diag = prev[j - 1];
            let substitute = Cell {
                cost: diag.cost + usize::from(pattern[i - 1] != text[j - 1]),
                start: diag.start,
            };
            let skip_pattern = Cell {
                cost: prev[j].cost + 1,
                start: prev[j].start,
            };
            let skip_text = Cell {
                cost: cur[j - 1].cost + 1,
                start: cur[j - 1].start,
            };
            cur[j] = substitute.better(skip_pattern).better(skip_text);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev.iter()
        .filter(|c| c.cost <= max_errors)
        .map(|c| c.cost as f64 / m as f64 + proximity(c.start, distance))
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
}

fn proximity(start: usize, distance: usize) -> f64 {
    match (start, distance) {
        (0, _) => 0.0,
        (_, 0) => 1.0,
        (s, d) => s as f64 / d as f64,
    }
}
