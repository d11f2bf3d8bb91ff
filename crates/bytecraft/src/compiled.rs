use std::collections::HashSet;

use crate::{
    conditional::ConditionalReader,
    errors::SchemaError,
    field::{Field, FieldSpec, RepeatedSpec},
    readers::ScalarReader,
};

/// Compiled form of one [Field]. Immutable and reusable across buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub key: String,
    pub kind: OperationKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OperationKind {
    /// Context-free read.
    Scalar(ScalarReader),
    /// Read that sees the partially decoded record.
    Conditional(ConditionalReader),
    Repeated(CompiledRepeat),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRepeat {
    pub operations: Vec<Operation>,
    pub bound: RepeatBound,
}

/// When a repeated field stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepeatBound {
    /// Element count is the value of this earlier sibling.
    Count(String),
    /// Repeat until the offset reaches the end of the buffer.
    EndOfBuffer,
}

/// Compiles `fields` into operations, in declaration order.
///
/// Sibling references (termination and condition fields) must name a field
/// declared earlier in the same record.
pub fn compile(fields: &[Field]) -> Result<Vec<Operation>, SchemaError> {
    let mut declared: HashSet<&str> = HashSet::with_capacity(fields.len());
    let mut operations = Vec::with_capacity(fields.len());

    for field in fields {
        if field.name.is_empty() {
            return Err(SchemaError::EmptyFieldName);
        }
        if declared.contains(field.name.as_str()) {
            return Err(SchemaError::DuplicateField(field.name.clone()));
        }

        operations.push(compile_field(field, &declared)?);
        declared.insert(field.name.as_str());
    }

    Ok(operations)
}

fn compile_field(field: &Field, declared: &HashSet<&str>) -> Result<Operation, SchemaError> {
    let require_declared = |reference: &str| {
        if declared.contains(reference) {
            Ok(())
        } else {
            Err(SchemaError::UndeclaredField {
                field: field.name.clone(),
                reference: reference.to_string(),
            })
        }
    };

    let kind = match &field.spec {
        FieldSpec::Scalar(reader) => {
            validate_reader(&field.name, reader)?;
            OperationKind::Scalar(*reader)
        }
        FieldSpec::Conditional(reader) => {
            if let ConditionalReader::When {
                field: sibling,
                reader: inner,
                ..
            } = reader
            {
                require_declared(sibling.as_str())?;
                validate_reader(&field.name, inner)?;
            }
            OperationKind::Conditional(reader.clone())
        }
        FieldSpec::Repeated(RepeatedSpec { fields, until }) => {
            if fields.is_empty() {
                return Err(SchemaError::EmptyRepeat(field.name.clone()));
            }

            let bound = match until {
                Some(sibling) => {
                    require_declared(sibling.as_str())?;
                    RepeatBound::Count(sibling.clone())
                }
                None => RepeatBound::EndOfBuffer,
            };

            OperationKind::Repeated(CompiledRepeat {
                operations: compile(fields)?,
                bound,
            })
        }
    };

    Ok(Operation {
        key: field.name.clone(),
        kind,
    })
}

fn validate_reader(field: &str, reader: &ScalarReader) -> Result<(), SchemaError> {
    if reader.is_valid() {
        Ok(())
    } else {
        Err(SchemaError::InvalidWidth {
            field: field.to_string(),
            kind: reader.kind(),
            width: reader.width(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::ReaderType;

    fn header() -> Vec<Field> {
        vec![
            Field::scalar("magic", ScalarReader::text(4)),
            Field::scalar("count", ScalarReader::uint(4)),
            Field::repeated(
                "items",
                vec![
                    Field::scalar("kind", ScalarReader::uint(1)),
                    Field::conditional(
                        "amount",
                        ConditionalReader::when("kind", &[0], ScalarReader::double()),
                    ),
                ],
                Some("count"),
            ),
        ]
    }

    #[test]
    fn test_compile_order_and_kinds() {
        let operations = compile(&header()).unwrap();

        let keys: Vec<&str> = operations.iter().map(|op| op.key.as_str()).collect();
        assert_eq!(keys, vec!["magic", "count", "items"]);

        assert_eq!(
            operations[0].kind,
            OperationKind::Scalar(ScalarReader::text(4))
        );

        let OperationKind::Repeated(repeat) = &operations[2].kind else {
            panic!("expected repeated operation");
        };
        assert_eq!(repeat.bound, RepeatBound::Count("count".to_string()));
        assert_eq!(repeat.operations.len(), 2);
        assert!(matches!(
            repeat.operations[1].kind,
            OperationKind::Conditional(_)
        ));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let fields = header();
        assert_eq!(compile(&fields).unwrap(), compile(&fields).unwrap());
    }

    #[test]
    fn test_compile_empty() {
        assert_eq!(compile(&[]).unwrap(), vec![]);
    }

    #[test]
    fn test_unbounded_repeat() {
        let fields = vec![Field::repeated(
            "rest",
            vec![Field::scalar("b", ScalarReader::uint(1))],
            None,
        )];
        let operations = compile(&fields).unwrap();

        let OperationKind::Repeated(repeat) = &operations[0].kind else {
            panic!("expected repeated operation");
        };
        assert_eq!(repeat.bound, RepeatBound::EndOfBuffer);
    }

    #[test]
    fn test_termination_field_declared_later() {
        let fields = vec![
            Field::repeated(
                "items",
                vec![Field::scalar("b", ScalarReader::uint(1))],
                Some("count"),
            ),
            Field::scalar("count", ScalarReader::uint(4)),
        ];

        assert_eq!(
            compile(&fields).unwrap_err(),
            SchemaError::UndeclaredField {
                field: "items".to_string(),
                reference: "count".to_string(),
            }
        );
    }

    #[test]
    fn test_condition_field_undeclared() {
        let fields = vec![Field::conditional(
            "amount",
            ConditionalReader::when("kind", &[0], ScalarReader::double()),
        )];

        assert!(matches!(
            compile(&fields).unwrap_err(),
            SchemaError::UndeclaredField { .. }
        ));
    }

    #[test]
    fn test_duplicate_field() {
        let fields = vec![
            Field::scalar("a", ScalarReader::uint(1)),
            Field::scalar("a", ScalarReader::uint(1)),
        ];

        assert_eq!(
            compile(&fields).unwrap_err(),
            SchemaError::DuplicateField("a".to_string())
        );
    }

    #[test]
    fn test_same_name_in_nested_record() {
        let fields = vec![
            Field::scalar("count", ScalarReader::uint(1)),
            Field::repeated(
                "items",
                vec![Field::scalar("count", ScalarReader::uint(1))],
                Some("count"),
            ),
        ];

        assert!(compile(&fields).is_ok());
    }

    #[test]
    fn test_invalid_width() {
        let fields = vec![Field::scalar("wide", ScalarReader::uint(9))];

        assert_eq!(
            compile(&fields).unwrap_err(),
            SchemaError::InvalidWidth {
                field: "wide".to_string(),
                kind: ReaderType::Uint,
                width: 9,
            }
        );
    }

    #[test]
    fn test_empty_repeat_and_name() {
        let fields = vec![Field::repeated("items", vec![], None)];
        assert_eq!(
            compile(&fields).unwrap_err(),
            SchemaError::EmptyRepeat("items".to_string())
        );

        let fields = vec![Field::scalar("", ScalarReader::uint(1))];
        assert_eq!(compile(&fields).unwrap_err(), SchemaError::EmptyFieldName);
    }
}
