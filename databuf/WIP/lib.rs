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
    uuid,
    message { what: Box<DataType> },
}

impl Default for DataType {
    fn default() -> Self {
        Self::unit
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DataType::unit => { write!(f, "unit") },
            DataType::int32 => { write!(f, "int32") },
            DataType::int64 => { write!(f, "int64") },
            DataType::uint32 => { write!(f, "uint32") },
            DataType::uint64 => { write!(f, "uint64") },
            DataType::sint32 => { write!(f, "sint32") },
            DataType::sint64 => { write!(f, "sint64") },
            DataType::Bool => { write!(f, "Bool") },
            DataType::fixed32 => { write!(f, "fixed32") },
            DataType::fixed64 => { write!(f, "fixed64") },
            DataType::sfixed32 => { write!(f, "sfixed32") },
            DataType::sfixed64 => { write!(f, "sfixed64") },
            DataType::float => { write!(f, "float") },
            DataType::double => { write!(f, "double") },
            DataType::bytes => { write!(f, "bytes") },
            DataType::string => { write!(f, "string") },
            DataType::uuid => { write!(f, "uuid") },
            DataType::message { what } => { write!(f, "{{{}}}", what) },
        }
    }
}

/////////////////////////////////////////////// Field //////////////////////////////////////////////

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Field {
    Defined { number: u32, name: Identifier, data_type: DataType },
    Reserved { number: u32 },
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Field::Defined { number, name, data_type } => {
                write!(f, "Field({} {} = {})", data_type, name.ident, number)
            },
            Field::Reserved { number } => {
                write!(f, "Field(reserved {})", number)
            }
        }
    }
}

///////////////////////////////////////////// FieldList ////////////////////////////////////////////

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldList {
    fields: Vec<Field>,
}

impl FieldList {
    pub fn from_vec(fields: Vec<Field>) -> Result<Self, String> {
        let mut fl = FieldList::default();
        for field in fields.iter() {
            fl.add_field(field.clone())?;
        }
        Ok(fl)
    }

    pub fn add_field(&mut self, field: Field) -> Result<(), String> {
        let (field_number, field_name) = match &field {
            Field::Defined { number, name, data_type: _ } => (number, Some(name)),
            Field::Reserved { number, } => (number, None),
        };
        for f in self.fields.iter() {
            match &f {
                Field::Defined { number, name, data_type: _ } => {
                    if number == field_number {
                        return Err(format!("{} collides with {} on number {}", field, f, number));
                    }
                    if Some(name) == field_name {
                        return Err(format!("{} collides with {} on name \"{}\"", field, f, name.ident));
                    }
                }
                Field::Reserved { number } => {
                    if number == field_number {
                        return Err(format!("{} collides with {} on number {}", field, f, number));
                    }
                }
            }
        }
        self.fields.push(field);
        Ok(())
    }
}

////////////////////////////////////////// TableDefinition /////////////////////////////////////////

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableDefinition {
    name: Identifier,
    key: Vec<Identifier>,
    fields: FieldList,
}

impl TableDefinition {
    pub fn new(name: Identifier, key: Vec<Identifier>, fields: FieldList) -> Result<Self, String> {
        let table = Self {
            name,
            key,
            fields,
        };
        for k in table.key.iter() {
            if !table.has_field_name(k) {
                return Err(format!("table {} has key element {}, but no field name {} exists",
                                   table.name.ident, k.ident, k.ident));
            }
        }
        Ok(table)
    }

    pub fn has_field_name(&self, name: &Identifier) -> bool {
        for f in self.fields.fields.iter() {
            match f {
                Field::Defined { number: _, name: n, data_type: _ } => {
                    if n == name {
                        return true;
                    }
                },
                Field::Reserved { number: _, } => {},
            };
        }
        false
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
