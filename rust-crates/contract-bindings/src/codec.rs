//! Conversions between binding types and `ScVal`.
//!
//! Contract structs travel as `ScVal::Map` keyed by field-name symbols in
//! ascending order, which is how the Soroban host lays out `#[contracttype]`
//! structs.

use crate::{
    address::{
        AccountAddress,
        Address,
    },
    error::{
        ClientError,
        Result,
    },
};
use stellar_xdr::curr::{
    Int128Parts,
    ScMap,
    ScMapEntry,
    ScString,
    ScSymbol,
    ScVal,
};

pub trait IntoScVal {
    fn into_sc_val(self) -> Result<ScVal>;
}

pub trait FromScVal: Sized {
    fn from_sc_val(val: &ScVal) -> Result<Self>;
}

impl IntoScVal for u32 {
    fn into_sc_val(self) -> Result<ScVal> {
        Ok(ScVal::U32(self))
    }
}

impl IntoScVal for bool {
    fn into_sc_val(self) -> Result<ScVal> {
        Ok(ScVal::Bool(self))
    }
}

impl IntoScVal for i128 {
    fn into_sc_val(self) -> Result<ScVal> {
        Ok(ScVal::I128(Int128Parts {
            hi: (self >> 64) as i64,
            lo: self as u64,
        }))
    }
}

impl IntoScVal for &str {
    fn into_sc_val(self) -> Result<ScVal> {
        let inner = self
            .try_into()
            .map_err(|_| ClientError::validation("string argument is too long"))?;
        Ok(ScVal::String(ScString(inner)))
    }
}

impl IntoScVal for String {
    fn into_sc_val(self) -> Result<ScVal> {
        self.as_str().into_sc_val()
    }
}

impl IntoScVal for AccountAddress {
    fn into_sc_val(self) -> Result<ScVal> {
        Ok(ScVal::Address(self.to_sc_address()))
    }
}

impl IntoScVal for Address {
    fn into_sc_val(self) -> Result<ScVal> {
        Ok(ScVal::Address(self.to_sc_address()))
    }
}

impl FromScVal for () {
    fn from_sc_val(val: &ScVal) -> Result<Self> {
        match val {
            ScVal::Void => Ok(()),
            other => Err(unexpected("void", other)),
        }
    }
}

impl FromScVal for bool {
    fn from_sc_val(val: &ScVal) -> Result<Self> {
        match val {
            ScVal::Bool(b) => Ok(*b),
            other => Err(unexpected("bool", other)),
        }
    }
}

impl FromScVal for u32 {
    fn from_sc_val(val: &ScVal) -> Result<Self> {
        match val {
            ScVal::U32(n) => Ok(*n),
            other => Err(unexpected("u32", other)),
        }
    }
}

impl FromScVal for i128 {
    fn from_sc_val(val: &ScVal) -> Result<Self> {
        match val {
            ScVal::I128(parts) => Ok(((parts.hi as i128) << 64) | parts.lo as i128),
            other => Err(unexpected("i128", other)),
        }
    }
}

impl FromScVal for String {
    fn from_sc_val(val: &ScVal) -> Result<Self> {
        match val {
            ScVal::String(ScString(s)) => String::from_utf8(s.to_vec())
                .map_err(|_| ClientError::decode("contract string is not valid UTF-8")),
            other => Err(unexpected("string", other)),
        }
    }
}

impl FromScVal for AccountAddress {
    fn from_sc_val(val: &ScVal) -> Result<Self> {
        match val {
            ScVal::Address(address) => AccountAddress::try_from(address),
            other => Err(unexpected("address", other)),
        }
    }
}

impl FromScVal for Address {
    fn from_sc_val(val: &ScVal) -> Result<Self> {
        match val {
            ScVal::Address(address) => Address::try_from(address),
            other => Err(unexpected("address", other)),
        }
    }
}

fn unexpected(wanted: &str, got: &ScVal) -> ClientError {
    ClientError::decode(format!("expected {wanted}, got {got:?}"))
}

/// Builds the map representation of a contract struct. Fields are sorted
/// here so callers may list them in declaration order.
pub fn struct_to_sc_val(fields: Vec<(&str, ScVal)>) -> Result<ScVal> {
    let mut fields = fields;
    fields.sort_by(|a, b| a.0.cmp(b.0));
    let mut entries = Vec::with_capacity(fields.len());
    for (name, val) in fields {
        let key = ScVal::Symbol(ScSymbol(
            name.try_into()
                .map_err(|_| ClientError::decode(format!("bad field name {name}")))?,
        ));
        entries.push(ScMapEntry { key, val });
    }
    let map = ScMap(
        entries
            .try_into()
            .map_err(|_| ClientError::decode("struct has too many fields"))?,
    );
    Ok(ScVal::Map(Some(map)))
}

/// Field lookup over a decoded contract struct.
pub struct StructFields<'a> {
    entries: &'a [ScMapEntry],
}

impl<'a> StructFields<'a> {
    pub fn new(val: &'a ScVal) -> Result<Self> {
        match val {
            ScVal::Map(Some(map)) => Ok(Self {
                entries: map.0.as_slice(),
            }),
            other => Err(unexpected("struct map", other)),
        }
    }

    pub fn get<T: FromScVal>(&self, name: &str) -> Result<T> {
        let entry = self
            .entries
            .iter()
            .find(|entry| match &entry.key {
                ScVal::Symbol(sym) => sym.0.as_slice() == name.as_bytes(),
                _ => false,
            })
            .ok_or_else(|| ClientError::decode(format!("missing struct field `{name}`")))?;
        T::from_sc_val(&entry.val)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| {
            matches!(&entry.key, ScVal::Symbol(sym) if sym.0.as_slice() == name.as_bytes())
        })
    }
}
