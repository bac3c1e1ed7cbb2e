//! File-name segment parsing and path pattern compilation.
//!
//! A segment mixes static text with bracketed parameters:
//!
//! | Syntax        | Token                         | Pattern        |
//! |---------------|-------------------------------|----------------|
//! | `about`       | static                        | `about`        |
//! | `[id]`        | required dynamic              | `:id()`        |
//! | `[[id]]`      | optional dynamic              | `:id?`         |
//! | `[...slug]`   | catch-all                     | `:slug(.*)*`   |
//! | `(admin)`     | group, contributes nothing    |                |

use crate::error::SegmentError;
use crate::pages::RouteMode;
use smallvec::SmallVec;

/// One lexical piece of a file-name segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentToken {
    Static(String),
    Dynamic {
        /// Parameter name restricted to `[A-Za-z0-9_.]`.
        name: String,
        /// Everything between the brackets, used verbatim in the pattern.
        raw: String,
        optional: bool,
    },
    CatchAll {
        name: String,
        raw: String,
    },
    Group(String),
}

impl SegmentToken {
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Contribution to the route name.
    pub fn name(&self) -> &str {
        match self {
            Self::Static(value) => value,
            Self::Dynamic { name, .. } | Self::CatchAll { name, .. } => name,
            Self::Group(_) => "",
        }
    }
}

pub type SegmentTokens = SmallVec<[SegmentToken; 2]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    Static,
    Dynamic,
    Optional,
    CatchAll,
    Group,
}

const fn is_param_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Tokenize one file-name segment.
pub fn parse_segment(segment: &str) -> Result<SegmentTokens, SegmentError> {
    let chars: Vec<char> = segment.chars().collect();
    let mut tokens = SegmentTokens::new();
    let mut state = State::Initial;
    let mut name = String::new();
    let mut raw = String::new();

    let mut flush = |state: State, name: &mut String, raw: &mut String| -> Result<(), SegmentError> {
        let token = match state {
            State::Initial => return Ok(()),
            State::Static if raw.is_empty() => return Ok(()),
            State::Static => SegmentToken::Static(std::mem::take(raw)),
            State::Group if raw.is_empty() => return Ok(()),
            State::Group => SegmentToken::Group(std::mem::take(raw)),
            State::Dynamic | State::Optional | State::CatchAll if name.is_empty() => {
                return Err(SegmentError::EmptyParam);
            }
            State::Dynamic | State::Optional => SegmentToken::Dynamic {
                name: std::mem::take(name),
                raw: std::mem::take(raw),
                optional: state == State::Optional,
            },
            State::CatchAll => SegmentToken::CatchAll {
                name: std::mem::take(name),
                raw: std::mem::take(raw),
            },
        };
        tokens.push(token);
        Ok(())
    };

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match state {
            State::Initial => {
                name.clear();
                raw.clear();
                match c {
                    '[' => state = State::Dynamic,
                    '(' => state = State::Group,
                    _ => {
                        state = State::Static;
                        continue;
                    }
                }
            }
            State::Static => match c {
                '[' => {
                    flush(state, &mut name, &mut raw)?;
                    state = State::Dynamic;
                }
                '(' => {
                    flush(state, &mut name, &mut raw)?;
                    state = State::Group;
                }
                _ => raw.push(c),
            },
            State::Group => {
                if c == ')' {
                    flush(state, &mut name, &mut raw)?;
                    state = State::Initial;
                } else {
                    raw.push(c);
                }
            }
            State::Dynamic | State::Optional | State::CatchAll => {
                if raw == "..." && name == "..." {
                    name.clear();
                    raw.clear();
                    state = State::CatchAll;
                }
                if c == '[' && state == State::Dynamic && raw.is_empty() {
                    state = State::Optional;
                } else if c == ']' && (state != State::Optional || (i > 0 && chars[i - 1] == ']')) {
                    flush(state, &mut name, &mut raw)?;
                    state = State::Initial;
                } else if c == ']' {
                    // first bracket of an optional's closing `]]`
                } else if is_param_char(c) {
                    name.push(c);
                    raw.push(c);
                } else {
                    raw.push(c);
                }
            }
        }
        i += 1;
    }

    match state {
        State::Dynamic | State::Optional | State::CatchAll => {
            Err(SegmentError::UnfinishedParam(name))
        }
        State::Group => Err(SegmentError::UnfinishedGroup(raw)),
        _ => {
            flush(state, &mut name, &mut raw)?;
            Ok(tokens)
        }
    }
}

/// Path pattern piece for a tokenized segment, with a leading `/`.
pub fn segment_pattern(tokens: &[SegmentToken]) -> String {
    let mut pattern = String::from("/");
    for token in tokens {
        match token {
            SegmentToken::Static(value) => encode_static(value, &mut pattern),
            SegmentToken::Dynamic {
                raw,
                optional: false,
                ..
            } => {
                pattern.push(':');
                pattern.push_str(raw);
                pattern.push_str("()");
            }
            SegmentToken::Dynamic {
                raw,
                optional: true,
                ..
            } => {
                pattern.push(':');
                pattern.push_str(raw);
                pattern.push('?');
            }
            SegmentToken::CatchAll { raw, .. } => {
                pattern.push(':');
                pattern.push_str(raw);
                pattern.push_str("(.*)*");
            }
            SegmentToken::Group(_) => {}
        }
    }
    pattern
}

/// Segment contribution to the route name.
pub fn segment_name(tokens: &[SegmentToken]) -> String {
    tokens.iter().map(SegmentToken::name).collect()
}

/// Percent-encode static text for a path pattern. Reserved path
/// characters survive, `:` is escaped so it is not read as a parameter.
fn encode_static(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            ':' => out.push_str("\\:"),
            c if c.is_ascii_alphanumeric() => out.push(c),
            ';' | ',' | '/' | '@' | '=' | '$' | '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '('
            | ')' | '|' => out.push(c),
            c => {
                let mut buf = [0; 4];
                out.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
            }
        }
    }
}

/// A non-group segment of a page path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSegment {
    pub name: String,
    /// Pattern piece with a leading `/`.
    pub pattern: String,
    /// The segment is the literal `index`.
    pub is_index: bool,
    /// Name of a catch-all parameter in this segment, if any.
    pub catch_all: Option<String>,
}

/// A page file path split into compiled segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPath {
    pub segments: Vec<CompiledSegment>,
    pub mode: RouteMode,
}

/// Path pattern and name of a page considered on its own, without
/// nesting under sibling files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRoute {
    pub path: String,
    pub name: String,
    pub mode: RouteMode,
}

/// Split a layer-relative page path into segments and tokenize each one.
///
/// The extension is dropped, a trailing `.client` / `.server` selects the
/// mode and segments made only of groups are skipped. `.server` is always
/// stripped but only yields [`RouteMode::Server`] when `server_pages` is on.
pub fn compile_path(relative_path: &str, server_pages: bool) -> Result<CompiledPath, SegmentError> {
    let mut stem = strip_extension(relative_path);
    let mut mode = RouteMode::Universal;
    if let Some(rest) = stem.strip_suffix(".client") {
        stem = rest;
        mode = RouteMode::Client;
    } else if let Some(rest) = stem.strip_suffix(".server") {
        stem = rest;
        if server_pages {
            mode = RouteMode::Server;
        }
    }

    let mut segments = Vec::new();
    for segment in stem.split('/') {
        let tokens = parse_segment(segment)?;
        if tokens.iter().all(SegmentToken::is_group) {
            continue;
        }

        let significant: SmallVec<[&SegmentToken; 2]> =
            tokens.iter().filter(|t| !t.is_group()).collect();
        let mut catch_all = None;
        for (pos, token) in significant.iter().enumerate() {
            if let SegmentToken::CatchAll { name, .. } = token {
                if pos + 1 != significant.len() {
                    return Err(SegmentError::CatchAllNotLast(name.clone()));
                }
                catch_all = Some(name.clone());
            }
        }

        segments.push(CompiledSegment {
            name: segment_name(&tokens),
            pattern: segment_pattern(&tokens),
            is_index: matches!(tokens.as_slice(), [SegmentToken::Static(v)] if v == "index"),
            catch_all,
        });
    }

    Ok(CompiledPath { segments, mode })
}

/// Compile a single page path into its standalone route path and name.
pub fn compile_route(relative_path: &str, server_pages: bool) -> Result<CompiledRoute, SegmentError> {
    let compiled = compile_path(relative_path, server_pages)?;
    let mut path = String::new();
    let mut key = String::new();
    let mut catch_all: Option<&str> = None;

    for segment in &compiled.segments {
        if !key.is_empty() {
            key.push('/');
        }
        key.push_str(&segment.name);
        if segment.is_index {
            continue;
        }
        if let Some(name) = catch_all {
            return Err(SegmentError::CatchAllNotLast(name.to_owned()));
        }
        path = join_url(&path, &segment.pattern);
        catch_all = segment.catch_all.as_deref();
    }

    Ok(CompiledRoute {
        path: with_leading_slash(&path),
        name: route_name(&key),
        mode: compiled.mode,
    })
}

/// Turn a `/`-joined key into a route name: a trailing `/index` is
/// dropped and separators become dashes.
pub fn route_name(key: &str) -> String {
    key.strip_suffix("/index").unwrap_or(key).replace('/', "-")
}

/// Join two URL fragments with exactly one slash between them.
/// Empty fragments and a bare `/` are ignored.
pub(crate) fn join_url(base: &str, segment: &str) -> String {
    if segment.is_empty() || segment == "/" {
        return base.to_owned();
    }
    if base.is_empty() {
        return segment.to_owned();
    }
    let segment = segment
        .strip_prefix("./")
        .or_else(|| segment.strip_prefix('/'))
        .unwrap_or(segment);
    if base.ends_with('/') {
        format!("{base}{segment}")
    } else {
        format!("{base}/{segment}")
    }
}

pub(crate) fn with_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{path}")
    }
}

fn strip_extension(path: &str) -> &str {
    let file_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[file_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..file_start + dot],
        _ => path,
    }
}
