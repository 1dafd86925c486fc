pub mod driver;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod string;
