//! Plain-text dataset format.
//!
//! Line oriented, whitespace separated:
//!
//! ```text
//! <num_facilities> <num_clients>
//! <capacity> <fixed_cost>          one line per facility
//! <demand_0> ... <demand_m-1>      one line
//! <cost_0> ... <cost_m-1>          one line per facility
//! ```
//!
//! Facilities are named `F0..`, clients `L0..`. Blank lines are ignored.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::{Client, FacilitySite, Instance};

struct DatasetLines<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    last: usize,
}

impl<'a> DatasetLines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            last: 0,
        }
    }

    /// Next non-blank line as (1-based number, tokens).
    fn next_tokens(&mut self, what: &str) -> Result<(usize, Vec<&'a str>)> {
        for (index, line) in self.lines.by_ref() {
            self.last = index + 1;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if !tokens.is_empty() {
                return Ok((index + 1, tokens));
            }
        }
        Err(Error::parse(
            self.last + 1,
            format!("unexpected end of file, expected {what}"),
        ))
    }

    fn values<T: FromStr>(&mut self, count: usize, what: &str) -> Result<(usize, Vec<T>)> {
        let (line, tokens) = self.next_tokens(what)?;
        if tokens.len() != count {
            return Err(Error::parse(
                line,
                format!("expected {count} values for {what}, found {}", tokens.len()),
            ));
        }
        let values = tokens
            .iter()
            .map(|t| {
                t.parse::<T>()
                    .map_err(|_| Error::parse(line, format!("invalid number '{t}' in {what}")))
            })
            .collect::<Result<Vec<T>>>()?;
        Ok((line, values))
    }

    fn expect_end(&mut self) -> Result<()> {
        match self.next_tokens("end of file") {
            Ok((line, _)) => Err(Error::parse(line, "unexpected content after cost matrix")),
            Err(_) => Ok(()),
        }
    }
}

impl FromStr for Instance {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let mut lines = DatasetLines::new(text);

        let (_, header) = lines.values::<usize>(2, "facility and client counts")?;
        let (num_facilities, num_clients) = (header[0], header[1]);

        let mut sites = Vec::with_capacity(num_facilities);
        for i in 0..num_facilities {
            let (_, v) = lines.values::<f64>(2, "capacity and fixed cost")?;
            sites.push(FacilitySite::new(format!("F{i}"), v[0], v[1]));
        }

        let (_, demands) = lines.values::<f64>(num_clients, "demands")?;
        let clients = demands
            .into_iter()
            .enumerate()
            .map(|(i, d)| Client::new(format!("L{i}"), d))
            .collect();

        let mut costs = Vec::with_capacity(num_facilities);
        for _ in 0..num_facilities {
            let (_, row) = lines.values::<f64>(num_clients, "cost row")?;
            costs.push(row);
        }
        lines.expect_end()?;

        let instance = Instance::new(sites, clients, costs);
        instance.validate()?;
        Ok(instance)
    }
}

impl Instance {
    /// Reads and parses a dataset file.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Instance> {
        let text = fs::read_to_string(path)?;
        text.parse()
    }

    /// Writes the instance in dataset format.
    ///
    /// Facility and client IDs are not stored; reading the output back
    /// renames them `F0..` and `L0..`.
    pub fn to_dataset_string(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{} {}", self.num_facilities(), self.num_clients());
        for site in &self.sites {
            let _ = writeln!(out, "{} {}", site.capacity, site.fixed_cost);
        }
        out.push_str(&join(self.clients.iter().map(|c| c.demand)));
        out.push('\n');
        for row in &self.costs {
            out.push_str(&join(row.iter().copied()));
            out.push('\n');
        }
        out
    }

    /// Writes the instance to a dataset file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_dataset_string())?;
        Ok(())
    }
}

fn join(values: impl Iterator<Item = f64>) -> String {
    values
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
