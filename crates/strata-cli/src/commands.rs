//! Command parsing and execution.
//!
//! The tokenizer splits on whitespace and tolerates `(`, `)` and `,`
//! either attached to a token or standing alone. This is a demo surface,
//! not a grammar: string literals with embedded whitespace are not
//! supported.

use anyhow::{anyhow, bail, Result};

use strata_common::types::{AggType, ColumnSpec, ColumnType, Value};
use strata_engine::Database;

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `CREATE TABLE <name> ( <col> <TYPE> [SUM|LAST] [INDEXED], ... )`
    CreateTable {
        /// Table name.
        name: String,
        /// Declared columns in order.
        columns: Vec<ColumnSpec>,
    },
    /// `INSERT INTO <name> VALUES ( v1, v2, ... )`
    Insert {
        /// Target table.
        table: String,
        /// Row values in schema order.
        values: Vec<Value>,
    },
    /// `SELECT * FROM <name>`: all visible physical rows.
    SelectAll {
        /// Target table.
        table: String,
    },
    /// `QUERY <name> <column> <value>`: the folded logical row.
    Query {
        /// Target table.
        table: String,
        /// Key column.
        column: String,
        /// Key value.
        value: Value,
    },
    /// `exit`
    Exit,
}

/// Splits a line into tokens, dropping standalone punctuation and
/// stripping punctuation glued to tokens.
fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace()
        .map(|raw| raw.trim_matches(|c| matches!(c, '(' | ')' | ',')))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses one literal: double-quoted → string, otherwise integer.
fn parse_value(token: &str) -> Result<Value> {
    if let Some(inner) = token.strip_prefix('"') {
        // Tolerate a missing closing quote, like the classic shells do
        let inner = inner.strip_suffix('"').unwrap_or(inner);
        return Ok(Value::from(inner));
    }
    token
        .parse::<i64>()
        .map(Value::Int)
        .map_err(|_| anyhow!("invalid number format '{token}'"))
}

/// Parses a line into a [`Command`].
pub fn parse(line: &str) -> Result<Command> {
    let tokens = tokenize(line);
    let Some(verb) = tokens.first() else {
        bail!("empty command");
    };

    match verb.to_ascii_uppercase().as_str() {
        "EXIT" => Ok(Command::Exit),
        "CREATE" => parse_create(&tokens),
        "INSERT" => parse_insert(&tokens),
        "SELECT" => parse_select(&tokens),
        "QUERY" => parse_query(&tokens),
        other => bail!("unknown command '{other}'"),
    }
}

fn parse_create(tokens: &[String]) -> Result<Command> {
    if tokens.len() < 3 || !tokens[1].eq_ignore_ascii_case("TABLE") {
        bail!("syntax: CREATE TABLE <name> ( <col> <TYPE> [SUM|LAST] [INDEXED], ... )");
    }
    let name = tokens[2].clone();

    let mut columns = Vec::new();
    let mut rest = &tokens[3..];
    while let [col_name, type_token, tail @ ..] = rest {
        let column_type = match type_token.to_ascii_uppercase().as_str() {
            "INT" => ColumnType::Int,
            "STRING" => ColumnType::Str,
            other => bail!("unknown column type '{other}'"),
        };

        let mut spec = ColumnSpec::new(col_name.clone(), column_type, AggType::Last);
        let mut tail = tail;
        while let [modifier, more @ ..] = tail {
            match modifier.to_ascii_uppercase().as_str() {
                "SUM" => spec.agg = AggType::Sum,
                "LAST" => spec.agg = AggType::Last,
                "INDEXED" => spec.indexed = true,
                _ => break,
            }
            tail = more;
        }
        columns.push(spec);
        rest = tail;
    }

    if columns.is_empty() {
        bail!("CREATE TABLE needs at least one column");
    }
    Ok(Command::CreateTable { name, columns })
}

fn parse_insert(tokens: &[String]) -> Result<Command> {
    if tokens.len() < 4
        || !tokens[1].eq_ignore_ascii_case("INTO")
        || !tokens[3].eq_ignore_ascii_case("VALUES")
    {
        bail!("syntax: INSERT INTO <name> VALUES ( v1, v2, ... )");
    }

    let values = tokens[4..]
        .iter()
        .map(|token| parse_value(token))
        .collect::<Result<Vec<_>>>()?;
    if values.is_empty() {
        bail!("INSERT needs at least one value");
    }

    Ok(Command::Insert {
        table: tokens[2].clone(),
        values,
    })
}

fn parse_select(tokens: &[String]) -> Result<Command> {
    match tokens {
        [_, star, from, table] if star == "*" && from.eq_ignore_ascii_case("FROM") => {
            Ok(Command::SelectAll {
                table: table.clone(),
            })
        }
        _ => bail!("syntax: SELECT * FROM <name>"),
    }
}

fn parse_query(tokens: &[String]) -> Result<Command> {
    match tokens {
        [_, table, column, value] => Ok(Command::Query {
            table: table.clone(),
            column: column.clone(),
            value: parse_value(value)?,
        }),
        _ => bail!("syntax: QUERY <name> <column> <value>"),
    }
}

/// Executes a command against the catalog, returning the text to print.
pub fn execute(db: &Database, command: Command) -> Result<String> {
    match command {
        Command::Exit => Ok(String::new()),
        Command::CreateTable { name, columns } => {
            db.create_table(&name, columns)?;
            Ok(format!("Table '{name}' created."))
        }
        Command::Insert { table, values } => {
            db.table(&table)?.insert(&values)?;
            Ok("1 row inserted.".to_string())
        }
        Command::SelectAll { table } => {
            let table = db.table(&table)?;
            let schema = table.schema();
            let rows = table.scan_snapshot();

            let mut out = String::new();
            let header: Vec<&str> = schema.iter().map(|s| s.name.as_str()).collect();
            out.push_str(&header.join(" | "));
            out.push('\n');
            for row in &rows {
                let cells: Vec<String> = row.iter().map(Value::render).collect();
                out.push_str(&cells.join(" | "));
                out.push('\n');
            }
            out.push_str(&format!("({} rows)", rows.len()));
            Ok(out)
        }
        Command::Query {
            table,
            column,
            value,
        } => {
            let table = db.table(&table)?;
            let result = table.query_snapshot(&column, &value)?;

            // Print in schema order for stable output
            let mut out = String::new();
            for spec in table.schema() {
                if let Some(rendered) = result.get(&spec.name) {
                    out.push_str(&format!("{} = {rendered}\n", spec.name));
                }
            }
            out.push_str(&format!("({} columns)", result.len()));
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_tokenize_tolerates_punctuation() {
        assert_eq!(
            tokenize("INSERT INTO t VALUES ( 1, \"a\", 2 )"),
            vec!["INSERT", "INTO", "t", "VALUES", "1", "\"a\"", "2"]
        );
        assert_eq!(
            tokenize("CREATE TABLE t (Product STRING, Price INT)"),
            vec!["CREATE", "TABLE", "t", "Product", "STRING", "Price", "INT"]
        );
    }

    #[test]
    fn test_parse_create_with_modifiers() {
        let command = parse(
            "CREATE TABLE inv ( Product STRING INDEXED, Price INT, Stock INT SUM )",
        )
        .unwrap();

        let Command::CreateTable { name, columns } = command else {
            panic!("wrong command");
        };
        assert_eq!(name, "inv");
        assert_eq!(columns.len(), 3);
        assert!(columns[0].indexed);
        assert_eq!(columns[0].column_type, ColumnType::Str);
        assert_eq!(columns[1].agg, AggType::Last);
        assert_eq!(columns[2].agg, AggType::Sum);
    }

    #[test]
    fn test_parse_insert_literals() {
        let command = parse("INSERT INTO inv VALUES (\"Tires\", 100, -5)").unwrap();
        let Command::Insert { table, values } = command else {
            panic!("wrong command");
        };
        assert_eq!(table, "inv");
        assert_eq!(
            values,
            vec![Value::from("Tires"), Value::Int(100), Value::Int(-5)]
        );
    }

    #[test]
    fn test_parse_rejects_bad_number() {
        assert!(parse("INSERT INTO t VALUES (12x)").is_err());
    }

    #[test]
    fn test_parse_select_and_exit() {
        assert_eq!(
            parse("SELECT * FROM inv").unwrap(),
            Command::SelectAll {
                table: "inv".to_string()
            }
        );
        assert_eq!(parse("exit").unwrap(), Command::Exit);
    }

    #[test]
    fn test_end_to_end_dispatch() {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path());

        execute(
            &db,
            parse("CREATE TABLE inv (Product STRING INDEXED, Price INT, Stock INT SUM)").unwrap(),
        )
        .unwrap();
        execute(&db, parse("INSERT INTO inv VALUES (\"Tires\", 100, 10)").unwrap()).unwrap();
        execute(&db, parse("INSERT INTO inv VALUES (\"Tires\", 120, 3)").unwrap()).unwrap();

        let out = execute(&db, parse("QUERY inv Product \"Tires\"").unwrap()).unwrap();
        assert!(out.contains("Price = 120"));
        assert!(out.contains("Stock = 13"));

        let out = execute(&db, parse("SELECT * FROM inv").unwrap()).unwrap();
        assert!(out.contains("(2 rows)"));
    }
}
