use std::collections::HashMap;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alphanumeric1, newline, none_of},
    combinator::{cut, map, opt, recognize},
    error::context,
    multi::{many0, many1_count, separated_list0},
    number::complete::double,
    sequence::{delimited, pair, terminated, tuple},
};

use crate::support_nom::{ewsunl, string_literal, ws0, ws1, ParseResult};

/////////////////////////////////////////// MetricReading //////////////////////////////////////////

#[derive(Clone, Debug)]
pub struct MetricReading {
    pub metric_name: String,
    pub labels: HashMap<String, String>,
    pub reading: f64,
    pub timestamp: Option<f64>,
}

impl Eq for MetricReading {}

impl PartialEq for MetricReading {
    fn eq(&self, other: &Self) -> bool {
        let timestamp_eq = match (self.timestamp.as_ref(), other.timestamp.as_ref()) {
            (Some(lhs), Some(rhs)) => f64::total_cmp(lhs, rhs).is_eq(),
            (None, None) => true,
            _ => false,
        };
        self.metric_name == other.metric_name
            && self.labels == other.labels
            && f64::total_cmp(&self.reading, &other.reading).is_eq()
            && timestamp_eq
    }
}

///////////////////////////////////////////// HelpText /////////////////////////////////////////////

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HelpText(String);

//////////////////////////////////////////// SensorType ////////////////////////////////////////////

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SensorType {
    Counter,
    Gauge,
    Histogram,
    Unsupported,
}

////////////////////////////////////////// TypeDeclaration /////////////////////////////////////////

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeDeclaration(String, SensorType);

impl TypeDeclaration {
    pub fn label(&self) -> &str {
        &self.0
    }

    pub fn sensor_type(&self) -> SensorType {
        self.1
    }
}

////////////////////////////////////////// PrometheusLine //////////////////////////////////////////

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PrometheusLine {
    MetricReading(MetricReading),
    HelpText(HelpText),
    TypeDeclaration(TypeDeclaration),
}

////////////////////////////////////////////// parsers /////////////////////////////////////////////

pub fn atom(input: &str) -> ParseResult<'_, String> {
    context(
        "metric name",
        map(
            recognize(many1_count(alt((
                alphanumeric1,
                tag("."),
                tag(":"),
                tag("-"),
                tag("_"),
            )))),
            String::from,
        ),
    )(input)
}

pub fn label(input: &str) -> ParseResult<'_, (String, String)> {
    context(
        "label",
        map(
            tuple((
                ws0,
                context("metric name", atom),
                ws0,
                context("equals", tag("=")),
                ws0,
                context("metric value", string_literal),
                ws0,
            )),
            |(_, key, _, _, _, value, _)| (key, value),
        ),
    )(input)
}

pub fn labels(input: &str) -> ParseResult<'_, HashMap<String, String>> {
    context(
        "label",
        map(
            delimited(
                context("opening brace", tag("{")),
                terminated(separated_list0(tag(","), label), opt(tag(","))),
                context("closing brace", tag("}")),
            ),
            HashMap::from_iter,
        ),
    )(input)
}

pub fn reading(input: &str) -> ParseResult<'_, f64> {
    context(
        "sensor reading",
        alt((
            map(tag("+Inf"), |_| f64::INFINITY),
            map(tag("-Inf"), |_| f64::NEG_INFINITY),
            map(tag("NaN"), |_| f64::NAN),
            double,
        )),
    )(input)
}

pub fn metric_reading(input: &str) -> ParseResult<'_, MetricReading> {
    context(
        "metric reading",
        map(
            tuple((
                ws0,
                atom,
                ws0,
                opt(labels),
                ws0,
                reading,
                opt(tuple((ws1, double))),
                ewsunl,
            )),
            |(_, metric_name, _, labels, _, reading, timestamp, _)| {
                let labels = labels.unwrap_or_default();
                let timestamp = timestamp.map(|x| x.1);
                MetricReading {
                    metric_name,
                    labels,
                    reading,
                    timestamp,
                }
            },
        ),
    )(input)
}

pub fn help_text(input: &str) -> ParseResult<'_, HelpText> {
    context(
        "help comment",
        map(
            tuple((
                ws0,
                tag("#"),
                ws0,
                tag("HELP"),
                ws1,
                recognize(pair(take_while(|c: char| c != '\n'), newline)),
            )),
            |(_, _, _, _, _, text): ((), &str, (), &str, (), &str)| {
                HelpText(text.trim().to_string())
            },
        ),
    )(input)
}

pub fn type_declaration(input: &str) -> ParseResult<'_, TypeDeclaration> {
    context(
        "type declaration",
        alt((
            map(
                tuple((
                    ws0,
                    tag("#"),
                    ws0,
                    tag("TYPE"),
                    ws1,
                    atom,
                    ws1,
                    tag("counter"),
                    cut(ewsunl),
                )),
                |(_, _, _, _, _, metric_name, _, _, _)| {
                    TypeDeclaration(metric_name, SensorType::Counter)
                },
            ),
            map(
                tuple((
                    ws0,
                    tag("#"),
                    ws0,
                    tag("TYPE"),
                    ws1,
                    atom,
                    ws1,
                    tag("gauge"),
                    cut(ewsunl),
                )),
                |(_, _, _, _, _, metric_name, _, _, _)| {
                    TypeDeclaration(metric_name, SensorType::Gauge)
                },
            ),
            map(
                tuple((
                    ws0,
                    tag("#"),
                    ws0,
                    tag("TYPE"),
                    ws1,
                    atom,
                    ws1,
                    tag("histogram"),
                    cut(ewsunl),
                )),
                |(_, _, _, _, _, metric_name, _, _, _)| {
                    TypeDeclaration(metric_name, SensorType::Histogram)
                },
            ),
        )),
    )(input)
}

pub fn comment(input: &str) -> ParseResult<'_, ()> {
    context(
        "comment",
        map(tuple((ws0, tag("#"), many0(none_of("\n")), ewsunl)), |_| ()),
    )(input)
}

pub fn parse(input: &str) -> ParseResult<'_, Vec<PrometheusLine>> {
    context(
        "prometheus metrics exposition",
        map(
            many0(alt((
                map(metric_reading, |r| Some(PrometheusLine::MetricReading(r))),
                map(help_text, |t| Some(PrometheusLine::HelpText(t))),
                map(type_declaration, |t| {
                    Some(PrometheusLine::TypeDeclaration(t))
                }),
                map(comment, |_| None),
            ))),
            |promlines| promlines.into_iter().flatten().collect(),
        ),
    )(input)
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
