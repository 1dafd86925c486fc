use std::{
    cell::{Ref, RefCell, RefMut},
    collections::BTreeMap,
    rc::Rc,
};

use compact_str::CompactString;

use crate::{parser::statement::Statement, string::Ident};

/// Trait name to trait value, kept sorted so printing and rendering are stable.
pub type Traits = BTreeMap<CompactString, CadlValue>;

/// A handle to a cat's traits. Clones share the same traits, so a cat reached
/// through an alias or a parameter is mutated in place.
#[derive(Clone)]
pub struct Cat {
    traits: Rc<RefCell<Traits>>,
}

impl Cat {
    pub fn new(traits: Traits) -> Self {
        Self {
            traits: Rc::new(RefCell::new(traits)),
        }
    }

    pub fn empty() -> Self {
        Self::new(Traits::new())
    }

    pub fn traits(&self) -> Ref<'_, Traits> {
        self.traits.borrow()
    }

    pub fn traits_mut(&self) -> RefMut<'_, Traits> {
        self.traits.borrow_mut()
    }

    pub fn get_trait(&self, name: &str) -> Option<CadlValue> {
        self.traits.borrow().get(name).cloned()
    }

    pub fn set_trait(&self, name: &str, value: CadlValue) {
        self.traits.borrow_mut().insert(name.into(), value);
    }

    pub fn is_same(&self, other: &Cat) -> bool {
        Rc::ptr_eq(&self.traits, &other.traits)
    }
}

/// Pairs of cats whose comparison is in progress, by address.
type Comparing = Vec<(*const RefCell<Traits>, *const RefCell<Traits>)>;

impl Cat {
    /// Compares traits structurally. A pair of cats already being compared
    /// further up counts as equal, so cats that contain themselves terminate.
    fn is_equal_within(&self, other: &Cat, comparing: &mut Comparing) -> bool {
        if self.is_same(other) {
            return true;
        }
        let pair = (Rc::as_ptr(&self.traits), Rc::as_ptr(&other.traits));
        if comparing.contains(&pair) {
            return true;
        }
        let lhs = self.traits.borrow();
        let rhs = other.traits.borrow();
        if lhs.len() != rhs.len() {
            return false;
        }
        comparing.push(pair);
        let equal = lhs.iter().zip(rhs.iter()).all(|((lk, lv), (rk, rv))| {
            lk == rk && lv.is_equal_within(rv, comparing)
        });
        comparing.pop();
        equal
    }
}

impl PartialEq for Cat {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal_within(other, &mut Comparing::new())
    }
}

// Cats can hold themselves as trait values, so only the trait names are printed.
impl std::fmt::Debug for Cat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cat")
            .field("traits", &self.traits.borrow().keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Debug)]
pub struct Function {
    pub name: Ident,
    pub parameters: Vec<Ident>,
    pub body: Statement,
}

#[derive(Debug, Clone)]
pub enum CadlValue {
    Integer(i64),
    String(CompactString),
    Bool(bool),
    Nil,
    Cat(Cat),
    Function(Rc<Function>),
}

impl CadlValue {
    pub fn is_truthy(&self) -> bool {
        match self {
            CadlValue::Bool(v) => *v,
            CadlValue::Nil => false,
            CadlValue::Integer(v) => *v != 0,
            CadlValue::String(v) => !v.is_empty(),
            CadlValue::Cat(_) | CadlValue::Function(_) => true,
        }
    }

    pub fn logical_not(&self) -> bool {
        !self.is_truthy()
    }

    pub fn is_equal(&self, other: &CadlValue) -> bool {
        self.is_equal_within(other, &mut Comparing::new())
    }

    fn is_equal_within(&self, other: &CadlValue, comparing: &mut Comparing) -> bool {
        match (self, other) {
            (CadlValue::Integer(lhs), CadlValue::Integer(rhs)) => lhs == rhs,
            (CadlValue::String(lhs), CadlValue::String(rhs)) => lhs == rhs,
            (CadlValue::Bool(lhs), CadlValue::Bool(rhs)) => lhs == rhs,
            (CadlValue::Nil, CadlValue::Nil) => true,
            (CadlValue::Cat(lhs), CadlValue::Cat(rhs)) => lhs.is_equal_within(rhs, comparing),
            (CadlValue::Function(lhs), CadlValue::Function(rhs)) => Rc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }

    pub fn as_cat(&self) -> Option<&Cat> {
        match self {
            CadlValue::Cat(cat) => Some(cat),
            _ => None,
        }
    }
}

impl PartialEq for CadlValue {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl From<i64> for CadlValue {
    fn from(value: i64) -> Self {
        CadlValue::Integer(value)
    }
}

impl From<&str> for CadlValue {
    fn from(value: &str) -> Self {
        CadlValue::String(value.into())
    }
}

impl From<bool> for CadlValue {
    fn from(value: bool) -> Self {
        CadlValue::Bool(value)
    }
}

impl std::fmt::Display for CadlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Nil => write!(f, "nil"),
            Self::Cat(cat) => {
                write!(f, "<cat")?;
                for (name, value) in cat.traits().iter() {
                    match value {
                        CadlValue::Cat(_) => write!(f, " {name}=<cat>")?,
                        value => write!(f, " {name}={value}")?,
                    }
                }
                write!(f, ">")
            }
            Self::Function(function) => write!(f, "<func {}>", function.name),
        }
    }
}
