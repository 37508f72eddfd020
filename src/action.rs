use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit0, one_of},
    combinator::{all_consuming, map, map_res, opt, recognize, value},
    sequence::{pair, preceded, tuple},
    IResult,
};
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};
use crate::jalali::JalaliDate;
use crate::navigation::{Direction, MonthIndex};

/// Payload ceiling of the host transport, in bytes.
pub const MAX_TOKEN_LEN: usize = 64;

const SEPARATOR: char = ':';

// ":s:-999999:12:31"
const MAX_PAYLOAD_LEN: usize = 16;

pub const MAX_PREFIX_LEN: usize = MAX_TOKEN_LEN - MAX_PAYLOAD_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Go to the month before the carried one.
    Prev(MonthIndex),
    /// Go to the month after the carried one.
    Next(MonthIndex),
    Select(JalaliDate),
    Ignore,
}

impl Action {
    pub fn navigation(&self) -> Option<(Direction, MonthIndex)> {
        match self {
            Action::Prev(idx) => Some((Direction::Prev, *idx)),
            Action::Next(idx) => Some((Direction::Next, *idx)),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Action::Prev(_) => "p",
            Action::Next(_) => "n",
            Action::Select(_) => "s",
            Action::Ignore => "i",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Payload {
    Prev(i32, u32),
    Next(i32, u32),
    Select(i32, u32, u32),
    Ignore,
}

/// Canonical decimal only: no leading zeros, no "-0".
fn integer<T: FromStr>(input: &str) -> IResult<&str, T> {
    map_res(
        alt((
            tag("0"),
            recognize(tuple((opt(char('-')), one_of("123456789"), digit0))),
        )),
        |s: &str| s.parse::<T>(),
    )(input)
}

fn field<T: FromStr>(input: &str) -> IResult<&str, T> {
    preceded(char(SEPARATOR), integer)(input)
}

fn payload(input: &str) -> IResult<&str, Payload> {
    alt((
        map(preceded(tag("p"), pair(field::<i32>, field::<u32>)), |(y, m)| {
            Payload::Prev(y, m)
        }),
        map(preceded(tag("n"), pair(field::<i32>, field::<u32>)), |(y, m)| {
            Payload::Next(y, m)
        }),
        map(preceded(tag("s"), tuple((field::<i32>, field::<u32>, field::<u32>))), |(y, m, d)| {
            Payload::Select(y, m, d)
        }),
        value(Payload::Ignore, tag("i")),
    ))(input)
}

fn month_index(year: i32, month: u32) -> Result<MonthIndex> {
    JalaliDate::from_ymd(year, month, 1).map(MonthIndex::from)
}

/// Packs actions into `<prefix>:<kind>[:<year>:<month>[:<day>]]`.
///
/// Each calendar instance gets its own prefix so tokens of another
/// instance on the same surface are recognised as foreign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCodec {
    prefix: String,
}

impl ActionCodec {
    pub fn new(prefix: &str) -> Result<Self> {
        if prefix.is_empty() || prefix.len() > MAX_PREFIX_LEN {
            return Err(Error::new(
                ErrorKind::InvalidPrefix,
                &format!(
                    "'{}' must be between 1 and {} bytes long",
                    prefix, MAX_PREFIX_LEN
                ),
            ));
        }

        if let Some(c) = prefix
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(Error::new(
                ErrorKind::InvalidPrefix,
                &format!("'{}' contains '{}'", prefix, c),
            ));
        }

        Ok(ActionCodec {
            prefix: prefix.to_owned(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn encode(&self, action: &Action) -> Result<String> {
        let fields = match action {
            Action::Prev(idx) | Action::Next(idx) => {
                let idx = month_index(idx.year, idx.month)?;
                vec![idx.year.to_string(), idx.month.to_string()]
            }
            Action::Select(date) => vec![
                date.year().to_string(),
                date.month().to_string(),
                date.day().to_string(),
            ],
            Action::Ignore => vec![],
        };

        let mut token = format!("{}{}{}", self.prefix, SEPARATOR, action.kind());
        for field in fields {
            token.push(SEPARATOR);
            token.push_str(&field);
        }

        debug_assert!(token.len() <= MAX_TOKEN_LEN);
        Ok(token)
    }

    pub fn ignore_token(&self) -> String {
        format!("{}{}{}", self.prefix, SEPARATOR, Action::Ignore.kind())
    }

    /// Whether `token` carries this instance's prefix.
    pub fn owns(&self, token: &str) -> bool {
        self.strip_prefix(token).is_some()
    }

    fn strip_prefix<'t>(&self, token: &'t str) -> Option<&'t str> {
        token
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix(SEPARATOR))
    }

    pub fn decode(&self, token: &str) -> Result<Action> {
        let rest = self.strip_prefix(token).ok_or_else(|| {
            Error::new(
                ErrorKind::UnknownToken,
                &format!("'{}' does not start with '{}{}'", token, self.prefix, SEPARATOR),
            )
        })?;

        if token.len() > MAX_TOKEN_LEN {
            return Err(Error::new(
                ErrorKind::MalformedToken,
                &format!("token is {} bytes long", token.len()),
            ));
        }

        let (_, parsed) = all_consuming(payload)(rest)?;

        let out_of_range = |err: Error| {
            Error::new(
                ErrorKind::MalformedToken,
                &format!("'{}' is out of range: {}", token, err),
            )
        };

        match parsed {
            Payload::Prev(year, month) => month_index(year, month)
                .map(Action::Prev)
                .map_err(out_of_range),
            Payload::Next(year, month) => month_index(year, month)
                .map(Action::Next)
                .map_err(out_of_range),
            Payload::Select(year, month, day) => JalaliDate::from_ymd(year, month, day)
                .map(Action::Select)
                .map_err(out_of_range),
            Payload::Ignore => Ok(Action::Ignore),
        }
    }
}
