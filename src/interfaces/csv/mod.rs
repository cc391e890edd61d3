pub mod rule_reader;
