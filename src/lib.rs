pub mod clients {
    pub mod repl;
}

pub mod consts {
    pub mod consts;
}

pub mod database {
    pub mod commands;
    pub mod database;
    pub mod model;
    pub mod options;

    pub mod table {
        pub mod filter;
        pub mod table;
    }
}

pub mod model {
    pub mod command;
    pub mod fields;
    pub mod person;
}

pub mod parser {
    pub mod parser;
    pub mod tokenizer;
}

pub mod persistence;
