//! Boolean queries: `"sub query" and "other" or "third"`.
//!
//! Sub-queries are quoted. Every sub-query after the first is preceded by
//! exactly `and` or `or`; nothing may precede the first one or follow the
//! last one. `and` binds tighter than `or`.

use std::{cmp::Ordering, fmt, mem, str::FromStr};

use crate::{
    error::{QueryError, Result},
    normalizer::Normalize,
    rank::Hit,
    token::Tokens,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            other => Err(QueryError::InvalidOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized sub-query and the operator joining it to its predecessor.
#[derive(Clone, Debug, PartialEq)]
pub struct Clause {
    pub operator: Option<Operator>,
    pub terms: Tokens,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BooleanQuery {
    clauses: Vec<Clause>,
}

impl BooleanQuery {
    /// Splits `query` on quotation marks and normalizes every sub-query.
    pub fn parse<N: Normalize + ?Sized>(query: &str, normalizer: &N) -> Result<Self> {
        let query = query.trim();
        let pieces = query.split('"').collect::<Vec<_>>();

        // Balanced quotes always leave an odd number of pieces.
        if pieces.len() % 2 == 0 {
            return Err(QueryError::UnbalancedQuotes.into());
        }

        let (trailing, pieces) = pieces
            .split_last()
            .ok_or(QueryError::Empty)?;

        if !trailing.trim().is_empty() {
            return Err(QueryError::TrailingText(trailing.trim().to_string()).into());
        }

        let clauses = pieces
            .chunks_exact(2)
            .enumerate()
            .map(|(position, pair)| -> Result<Clause> {
                let (slot, text) = (pair[0].trim(), pair[1]);

                let operator = match position {
                    0 if slot.is_empty() => None,
                    0 => return Err(QueryError::LeadingOperator(slot.to_string()).into()),
                    _ => Some(slot.parse::<Operator>()?),
                };

                Ok(Clause {
                    operator,
                    terms: normalizer.normalize(text.trim()),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if clauses.is_empty() {
            return Err(QueryError::Empty.into());
        }

        Ok(Self { clauses })
    }

    #[inline]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Operators between consecutive clauses.
    pub fn operators(&self) -> impl Iterator<Item = Operator> + '_ {
        self.clauses.iter().filter_map(|clause| clause.operator)
    }

    /// Canonical text of the normalized query.
    ///
    /// Every clause stays quoted, so a single sub-query whose terms normalize
    /// to `and`/`or` never reads like two clauses.
    pub fn reconstruct(&self) -> String {
        let mut parts = Vec::with_capacity(self.clauses.len() * 2);

        for clause in &self.clauses {
            if let Some(operator) = clause.operator {
                parts.push(operator.as_str().to_string());
            }
            parts.push(format!("\"{}\"", clause.terms.join()));
        }

        parts.join(" ")
    }

    /// Scores every clause with `score` and reduces the lists.
    ///
    /// The result is ordered by docId; ranking is left to the caller.
    pub fn evaluate<F>(&self, mut score: F) -> Result<Vec<Hit>>
    where
        F: FnMut(&Tokens) -> Result<Vec<Hit>>,
    {
        let mut operands = Vec::with_capacity(self.clauses.len());

        for clause in &self.clauses {
            let mut hits = score(&clause.terms)?;
            hits.sort_unstable_by_key(|hit| hit.doc_id);
            operands.push(hits);
        }

        Ok(reduce(operands, self.operators().collect()))
    }
}

/// Combines docId-sorted operand lists joined by `operators`.
///
/// `and` pairs are merged first, always picking the adjacent pair with the
/// smallest combined length. The remaining lists are then unioned left to
/// right.
pub fn reduce(mut operands: Vec<Vec<Hit>>, mut operators: Vec<Operator>) -> Vec<Hit> {
    debug_assert_eq!(operands.len(), operators.len() + 1);

    // Live operands in query order, as indices into `operands`.
    let mut chain = (0..operands.len()).collect::<Vec<_>>();

    while let Some(position) = cheapest_and(&operands, &chain, &operators) {
        let right = chain.remove(position + 1);
        let left = chain[position];
        operators.remove(position);

        let rhs = mem::take(&mut operands[right]);
        operands[left] = intersect(&operands[left], &rhs);
    }

    chain
        .into_iter()
        .map(|index| mem::take(&mut operands[index]))
        .reduce(|acc, next| union(&acc, &next))
        .unwrap_or_default()
}

fn cheapest_and(operands: &[Vec<Hit>], chain: &[usize], operators: &[Operator]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;

    for (position, operator) in operators.iter().enumerate() {
        if *operator != Operator::And {
            continue;
        }

        let cost = operands[chain[position]].len() + operands[chain[position + 1]].len();
        if best.map_or(true, |(_, lowest)| cost < lowest) {
            best = Some((position, cost));
        }
    }

    best.map(|(position, _)| position)
}

/// Documents present in both lists, scores summed.
pub fn intersect(a: &[Hit], b: &[Hit]) -> Vec<Hit> {
    let mut merged = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        match a[i].doc_id.cmp(&b[j].doc_id) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                merged.push(Hit::new(a[i].doc_id, a[i].score + b[j].score));
                i += 1;
                j += 1;
            }
        }
    }

    merged
}

/// Documents present in either list, the higher score kept.
pub fn union(a: &[Hit], b: &[Hit]) -> Vec<Hit> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        match a[i].doc_id.cmp(&b[j].doc_id) {
            Ordering::Less => {
                merged.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                merged.push(b[j]);
                j += 1;
            }
            Ordering::Equal => {
                merged.push(Hit::new(a[i].doc_id, a[i].score.max(b[j].score)));
                i += 1;
                j += 1;
            }
        }
    }

    merged.extend_from_slice(&a[i..]);
    merged.extend_from_slice(&b[j..]);
    merged
}
