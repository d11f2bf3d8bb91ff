//! The MPS7 transaction log layout and a typed view over decoded records.
//!
//! ```text
//! header  : magic "MPS7" (4) | version (1) | record count (4)
//! record  : type (1) | timestamp (4) | user id (8) | amount (8, debit/credit only)
//! ```

use bytecraft::{
    Record, Registry, Schema, SchemaError, Value,
    conditional::ConditionalReader,
    field::Field,
    readers::{ReaderType, ScalarReader},
};

use crate::error::LogError;

pub const MAGIC: &str = "MPS7";

/// Builds the MPS7 schema from the readers in `registry`.
pub fn schema(registry: &Registry) -> Result<Schema, SchemaError> {
    let lookup = |kind: ReaderType, width: usize| -> Result<ScalarReader, SchemaError> {
        registry
            .get(kind, width)
            .ok_or(SchemaError::UnknownReader { kind, width })
    };

    let magic = lookup(ReaderType::Text, 4)?;
    let byte = lookup(ReaderType::Uint, 1)?;
    let word = lookup(ReaderType::Uint, 4)?;
    let long = lookup(ReaderType::Uint, 8)?;
    let double = lookup(ReaderType::Double, 8)?;

    let debit = RecordType::Debit as u64;
    let credit = RecordType::Credit as u64;

    let record = vec![
        Field::scalar("recordType", byte),
        Field::scalar("timestamp", word),
        Field::scalar("userId", long),
        Field::conditional(
            "dollarAmount",
            ConditionalReader::when("recordType", &[debit, credit], double),
        ),
    ];

    Schema::compile(&[
        Field::scalar("magicString", magic),
        Field::scalar("version", byte),
        Field::scalar("recordCount", word),
        Field::repeated("records", record, Some("recordCount")),
    ])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    Debit = 0,
    Credit = 1,
    StartAutopay = 2,
    EndAutopay = 3,
}

impl TryFrom<u64> for RecordType {
    type Error = LogError;

    fn try_from(code: u64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(RecordType::Debit),
            1 => Ok(RecordType::Credit),
            2 => Ok(RecordType::StartAutopay),
            3 => Ok(RecordType::EndAutopay),
            other => Err(LogError::UnknownRecordType(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub kind: RecordType,
    pub timestamp: u64,
    pub user_id: u64,
    /// Present for debits and credits only.
    pub amount: Option<f64>,
}

impl TryFrom<&Record> for Transaction {
    type Error = LogError;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        let uint = |key: &'static str| {
            record
                .get(key)
                .and_then(Value::as_u64)
                .ok_or(LogError::MissingField(key))
        };

        let amount = match record.get("dollarAmount") {
            Some(Value::Double(v)) => Some(*v),
            Some(Value::Absent) => None,
            _ => return Err(LogError::MissingField("dollarAmount")),
        };

        Ok(Transaction {
            kind: RecordType::try_from(uint("recordType")?)?,
            timestamp: uint("timestamp")?,
            user_id: uint("userId")?,
            amount,
        })
    }
}

/// Checks the header of a decoded log and returns its transactions.
pub fn transactions(log: &Record) -> Result<Vec<Transaction>, LogError> {
    let magic = log
        .get("magicString")
        .and_then(Value::as_str)
        .ok_or(LogError::MissingField("magicString"))?;
    if magic != MAGIC {
        return Err(LogError::BadMagic(magic.to_string()));
    }

    log.get("records")
        .and_then(Value::as_list)
        .ok_or(LogError::MissingField("records"))?
        .iter()
        .map(Transaction::try_from)
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Encodes an MPS7 log with the given records.
    pub(crate) fn encode(records: &[(u8, u32, u64, Option<f64>)]) -> Vec<u8> {
        let mut data = b"MPS7\x01".to_vec();
        data.extend_from_slice(&(records.len() as u32).to_be_bytes());

        for &(kind, timestamp, user, amount) in records {
            data.push(kind);
            data.extend_from_slice(&timestamp.to_be_bytes());
            data.extend_from_slice(&user.to_be_bytes());
            if let Some(amount) = amount {
                data.extend_from_slice(&amount.to_be_bytes());
            }
        }

        data
    }

    #[test]
    fn test_schema_compiles_from_standard_registry() {
        let schema = schema(&Registry::standard()).unwrap();
        assert_eq!(schema.operations().len(), 4);
    }

    #[test]
    fn test_schema_needs_registered_readers() {
        assert!(matches!(
            schema(&Registry::empty()).unwrap_err(),
            SchemaError::UnknownReader { .. }
        ));
    }

    #[test]
    fn test_transactions() {
        let data = encode(&[
            (0, 10, 2456938384156277127, Some(10.0)),
            (3, 11, 7, None),
        ]);
        let parsed = schema(&Registry::standard()).unwrap().parse(&data).unwrap();
        let txs = transactions(&parsed.data).unwrap();

        assert_eq!(
            txs,
            vec![
                Transaction {
                    kind: RecordType::Debit,
                    timestamp: 10,
                    user_id: 2456938384156277127,
                    amount: Some(10.0),
                },
                Transaction {
                    kind: RecordType::EndAutopay,
                    timestamp: 11,
                    user_id: 7,
                    amount: None,
                },
            ]
        );
    }

    #[test]
    fn test_unknown_record_type() {
        let data = encode(&[(9, 10, 1, None)]);
        let parsed = schema(&Registry::standard()).unwrap().parse(&data).unwrap();

        assert!(matches!(
            transactions(&parsed.data).unwrap_err(),
            LogError::UnknownRecordType(9)
        ));
    }

    #[test]
    fn test_bad_magic() {
        let mut data = encode(&[]);
        data[3] = b'8';
        let parsed = schema(&Registry::standard()).unwrap().parse(&data).unwrap();

        assert!(matches!(
            transactions(&parsed.data).unwrap_err(),
            LogError::BadMagic(magic) if magic == "MPS8"
        ));
    }
}
