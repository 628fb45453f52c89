//! Maven version ordering and version ranges.
//!
//! Maven versions are not semver. Ordering follows Maven's rules closely
//! enough for range selection:
//!
//! - versions split into items on `.`, `-` and digit/letter transitions
//! - numeric items compare numerically and are newer than any qualifier
//! - qualifiers rank `alpha < beta < milestone < rc < snapshot < (release) < sp`,
//!   with `a1`/`b1`/`m1` shorthands and `cr`, `ga`, `final`, `release` aliases
//! - unknown qualifiers sort after `sp`, lexically among themselves
//! - trailing zero and release items are insignificant (`1.0` == `1` == `1.0.0-ga`)
//!
//! A dependency's version text is either a soft requirement (`1.2.3`, used
//! as-is), a range set (`[1.0,2.0)`, `(,1.5],[1.7,)`), or one of the meta
//! versions `LATEST` / `RELEASE`.

use std::cmp::Ordering;
use std::fmt;

/// One comparable item of a version.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Number(String),
    Qualifier(String),
}

impl Item {
    fn is_null(&self) -> bool {
        match self {
            Item::Number(digits) => digits.is_empty(),
            Item::Qualifier(q) => q.is_empty(),
        }
    }
}

fn qualifier_rank(qualifier: &str) -> usize {
    match qualifier {
        "alpha" => 0,
        "beta" => 1,
        "milestone" => 2,
        "rc" => 3,
        "snapshot" => 4,
        "" => 5,
        "sp" => 6,
        _ => 7,
    }
}

fn compare_qualifiers(a: &str, b: &str) -> Ordering {
    qualifier_rank(a).cmp(&qualifier_rank(b)).then_with(|| a.cmp(b))
}

fn compare_numbers(a: &str, b: &str) -> Ordering {
    // Leading zeros are stripped at parse time, so longer means larger
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_items(a: Option<&Item>, b: Option<&Item>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(item), None) => compare_items(Some(item), Some(&Item::Qualifier(String::new()))),
        (None, Some(item)) => compare_items(Some(&Item::Qualifier(String::new())), Some(item)),
        (Some(Item::Number(x)), Some(Item::Number(y))) => compare_numbers(x, y),
        (Some(Item::Number(x)), Some(Item::Qualifier(_))) => {
            if x.is_empty() {
                // A zero compares like the release marker
                compare_items(Some(&Item::Qualifier(String::new())), b)
            } else {
                Ordering::Greater
            }
        }
        (Some(Item::Qualifier(_)), Some(Item::Number(y))) => {
            if y.is_empty() {
                compare_items(a, Some(&Item::Qualifier(String::new())))
            } else {
                Ordering::Less
            }
        }
        (Some(Item::Qualifier(x)), Some(Item::Qualifier(y))) => compare_qualifiers(x, y),
    }
}

/// A parsed, comparable Maven version.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    original: String,
    items: Vec<Item>,
}

impl MavenVersion {
    /// Parse a version. Every string is a valid Maven version.
    pub fn parse(version: &str) -> Self {
        let lower = version.trim().to_lowercase();
        let mut items = Vec::new();
        let mut current = String::new();
        let mut current_is_digit = false;

        let mut flush = |current: &mut String, is_digit: bool, followed_by_digit: bool| {
            if current.is_empty() {
                return;
            }
            let token = std::mem::take(current);
            if is_digit {
                items.push(Item::Number(token.trim_start_matches('0').to_string()));
            } else {
                let canonical = match token.as_str() {
                    "a" if followed_by_digit => "alpha",
                    "b" if followed_by_digit => "beta",
                    "m" if followed_by_digit => "milestone",
                    "cr" => "rc",
                    "ga" | "final" | "release" => "",
                    other => other,
                };
                items.push(Item::Qualifier(canonical.to_string()));
            }
        };

        for c in lower.chars() {
            if c == '.' || c == '-' || c == '_' {
                flush(&mut current, current_is_digit, false);
                continue;
            }
            let is_digit = c.is_ascii_digit();
            if !current.is_empty() && is_digit != current_is_digit {
                flush(&mut current, current_is_digit, is_digit);
            }
            current_is_digit = is_digit;
            current.push(c);
        }
        flush(&mut current, current_is_digit, false);

        while items.last().is_some_and(Item::is_null) {
            items.pop();
        }

        Self {
            original: version.trim().to_string(),
            items,
        }
    }

    /// The text the version was parsed from.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Whether this is a `-SNAPSHOT` version.
    pub fn is_snapshot(&self) -> bool {
        self.original.ends_with("-SNAPSHOT")
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.items.len().max(other.items.len());
        for i in 0..len {
            let ordering = compare_items(self.items.get(i), other.items.get(i));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// One interval of a range set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restriction {
    lower: Option<MavenVersion>,
    lower_inclusive: bool,
    upper: Option<MavenVersion>,
    upper_inclusive: bool,
}

impl Restriction {
    /// Whether `version` lies inside the interval.
    pub fn contains(&self, version: &MavenVersion) -> bool {
        if let Some(lower) = &self.lower {
            match version.cmp(lower) {
                Ordering::Less => return false,
                Ordering::Equal if !self.lower_inclusive => return false,
                _ => {}
            }
        }
        if let Some(upper) = &self.upper {
            match version.cmp(upper) {
                Ordering::Greater => return false,
                Ordering::Equal if !self.upper_inclusive => return false,
                _ => {}
            }
        }
        true
    }
}

/// What a dependency's `<version>` asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequirement {
    /// A plain version, used as-is
    Soft(String),
    /// A union of intervals; the highest available match wins
    Ranges(Vec<Restriction>),
    /// Newest version, snapshots included
    Latest,
    /// Newest non-snapshot version
    Release,
}

impl VersionRequirement {
    /// Parse version text. Returns an error message for malformed ranges.
    pub fn parse(text: &str) -> Result<Self, String> {
        let text = text.trim();
        match text {
            "LATEST" => return Ok(Self::Latest),
            "RELEASE" => return Ok(Self::Release),
            _ => {}
        }
        if !text.starts_with('[') && !text.starts_with('(') {
            return Ok(Self::Soft(text.to_string()));
        }

        let mut restrictions = Vec::new();
        let mut rest = text;
        while !rest.is_empty() {
            let lower_inclusive = match rest.chars().next() {
                Some('[') => true,
                Some('(') => false,
                _ => return Err(format!("expected '[' or '(' in range '{text}'")),
            };
            let close = rest
                .find([']', ')'])
                .ok_or_else(|| format!("unterminated range '{text}'"))?;
            let upper_inclusive = rest[close..].starts_with(']');
            let inner = &rest[1..close];

            let restriction = match inner.split_once(',') {
                None => {
                    if !lower_inclusive || !upper_inclusive || inner.trim().is_empty() {
                        return Err(format!("single version must be written [x] in '{text}'"));
                    }
                    let exact = MavenVersion::parse(inner);
                    Restriction {
                        lower: Some(exact.clone()),
                        lower_inclusive: true,
                        upper: Some(exact),
                        upper_inclusive: true,
                    }
                }
                Some((lower, upper)) => {
                    let lower = lower.trim();
                    let upper = upper.trim();
                    let restriction = Restriction {
                        lower: (!lower.is_empty()).then(|| MavenVersion::parse(lower)),
                        lower_inclusive,
                        upper: (!upper.is_empty()).then(|| MavenVersion::parse(upper)),
                        upper_inclusive,
                    };
                    if let (Some(l), Some(u)) = (&restriction.lower, &restriction.upper)
                        && l > u
                    {
                        return Err(format!("lower bound exceeds upper bound in '{text}'"));
                    }
                    restriction
                }
            };
            restrictions.push(restriction);

            rest = rest[close + 1..].trim_start();
            if let Some(after_comma) = rest.strip_prefix(',') {
                rest = after_comma.trim_start();
            }
        }

        Ok(Self::Ranges(restrictions))
    }

    /// Whether selection needs the repository's version listing.
    pub fn needs_listing(&self) -> bool {
        !matches!(self, Self::Soft(_))
    }

    /// Whether `version` satisfies this requirement.
    pub fn matches(&self, version: &MavenVersion) -> bool {
        match self {
            Self::Soft(text) => MavenVersion::parse(text) == *version,
            Self::Ranges(restrictions) => restrictions.iter().any(|r| r.contains(version)),
            Self::Latest => true,
            Self::Release => !version.is_snapshot(),
        }
    }

    /// Choose the highest matching version from a listing.
    pub fn select<'a, I>(&self, available: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        if let Self::Soft(text) = self {
            return Some(text.clone());
        }
        available
            .into_iter()
            .map(MavenVersion::parse)
            .filter(|v| self.matches(v))
            .max()
            .map(|v| v.as_str().to_string())
    }
}
