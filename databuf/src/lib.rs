#[macro_use]
extern crate lalrpop_util;

lalrpop_mod!(pub schema);

//////////////////////////////////////////// Identifier ////////////////////////////////////////////

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Identifier {
    ident: String,
}

impl Identifier {
    fn new(what: &str) -> Option<Self> {
        const ALPHA: &str = "_abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
        const DIGITS: &str = "0123456789";
        if what.len() < 1 {
            return None;
        }
        let mut chars = what.chars();
        let first = chars.next();
        if first == None {
            return None;
        }
        if !ALPHA.contains(first.unwrap()) {
            return None;
        }
        for c in chars {
            if !ALPHA.contains(c) && !DIGITS.contains(c) {
                return None;
            }
        }
        let ident = Identifier {
            ident: what.to_string(),
        };
        Some(ident)
    }
}

///////////////////////////////////////////// DataType /////////////////////////////////////////////

#[allow(non_camel_case_types)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataType {
    unit,
    int32,
    int64,
    uint32,
    uint64,
    sint32,
    sint64,
    Bool,
    fixed32,
    fixed64,
    sfixed32,
    sfixed64,
    float,
    double,
    bytes,
    string,
    message { what: Box<DataType> },
}

impl Default for DataType {
    fn default() -> Self {
        Self::unit
    }
}

/////////////////////////////////////////////// Field //////////////////////////////////////////////

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Field {
    Defined { number: u32, name: Identifier, data_type: DataType },
    Reserved { number: u32 },
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
