use std::fmt;

use crate::mps7::{RecordType, Transaction};

/// The user whose balance is reported when none is given.
pub const DEFAULT_USER: u64 = 2456938384156277127;

/// Aggregates over one transaction log.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_debits: f64,
    pub total_credits: f64,
    pub autopays_started: usize,
    pub autopays_ended: usize,
    pub user_id: u64,
    /// Credits minus debits for `user_id`.
    pub balance: f64,
}

impl Summary {
    pub fn new(transactions: &[Transaction], user_id: u64) -> Self {
        let total = |kind: RecordType| -> f64 {
            transactions
                .iter()
                .filter(|tx| tx.kind == kind)
                .filter_map(|tx| tx.amount)
                .sum()
        };
        let count = |kind: RecordType| transactions.iter().filter(|tx| tx.kind == kind).count();

        let balance = transactions
            .iter()
            .filter(|tx| tx.user_id == user_id)
            .fold(0.0, |balance, tx| match (tx.kind, tx.amount) {
                (RecordType::Credit, Some(amount)) => balance + amount,
                (RecordType::Debit, Some(amount)) => balance - amount,
                _ => balance,
            });

        Summary {
            total_debits: total(RecordType::Debit),
            total_credits: total(RecordType::Credit),
            autopays_started: count(RecordType::StartAutopay),
            autopays_ended: count(RecordType::EndAutopay),
            user_id,
            balance,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total debit amount={:.2}", self.total_debits)?;
        writeln!(f, "total credit amount={:.2}", self.total_credits)?;
        writeln!(f, "autopays started={}", self.autopays_started)?;
        writeln!(f, "autopays ended={}", self.autopays_ended)?;
        write!(f, "balance for user {}={:.2}", self.user_id, self.balance)
    }
}
