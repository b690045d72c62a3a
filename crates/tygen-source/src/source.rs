//! The interface a host type-checker implements.
//!
//! `RawType` is the shape of one host type as the adapter sees it:
//! classification plus kind-specific payload, with every inner type
//! left as an opaque `HostTypeId`. Lifting information (generic
//! instantiations and alias symbols) is queried separately so the
//! adapter can compose the two wrappers in a fixed order.

use tygen_common::SourceLocation;
use tygen_model::{CallableFlavor, LiteralValue, Modifiers, ObjectFlavor};

/// Opaque identity of a host type. Hosts map whatever handle their
/// checker uses onto a stable integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostTypeId(pub u64);

/// Primitive classifications a host can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawPrimitive {
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    Null,
    Undefined,
    Void,
    Any,
    Unknown,
    Never,
    NonPrimitiveObject,
}

/// A named member as reported by the host. Members without a
/// declaration are dropped during adaptation.
#[derive(Debug, Clone)]
pub struct RawMember {
    pub name: String,
    pub ty: HostTypeId,
    pub optional: bool,
    pub modifiers: Modifiers,
    pub has_declaration: bool,
}

impl RawMember {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: HostTypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            modifiers: Modifiers::empty(),
            has_declaration: true,
        }
    }
}

/// A callable parameter as reported by the host.
#[derive(Debug, Clone)]
pub struct RawParameter {
    pub name: String,
    pub ty: HostTypeId,
    pub optional: bool,
    pub rest: bool,
    pub has_initializer: bool,
}

impl RawParameter {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: HostTypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            rest: false,
            has_initializer: false,
        }
    }
}

/// A type predicate as reported by the host.
#[derive(Debug, Clone)]
pub struct RawPredicate {
    pub parameter_name: String,
    pub parameter_index: usize,
    pub ty: HostTypeId,
}

/// One tuple element as reported by the host.
#[derive(Debug, Clone, Copy)]
pub struct RawTupleMember {
    pub ty: HostTypeId,
    pub optional: bool,
}

/// One host type: classification plus kind-specific shape.
#[derive(Debug, Clone)]
pub enum RawType {
    Primitive(RawPrimitive),
    Literal(LiteralValue),
    UniqueSymbol {
        name: String,
    },
    EnumMember {
        name: String,
        qualified_name: String,
        value: LiteralValue,
    },
    Enum {
        name: String,
        members: Vec<HostTypeId>,
    },
    Union {
        variants: Vec<HostTypeId>,
        discriminant_members: Vec<String>,
    },
    Intersection {
        variants: Vec<HostTypeId>,
        intersected: Option<HostTypeId>,
    },
    ObjectLike {
        flavor: ObjectFlavor,
        name: Option<String>,
        members: Vec<RawMember>,
        call_signature: Option<HostTypeId>,
        ctor_signature: Option<HostTypeId>,
        type_parameters: Vec<HostTypeId>,
        string_index: Option<HostTypeId>,
        number_index: Option<HostTypeId>,
    },
    Callable {
        flavor: CallableFlavor,
        name: Option<String>,
        type_parameters: Vec<HostTypeId>,
        parameters: Vec<RawParameter>,
        return_type: HostTypeId,
        predicate: Option<RawPredicate>,
    },
    TypeParameter {
        name: String,
        constraint: Option<HostTypeId>,
        default: Option<HostTypeId>,
    },
    Tuple {
        members: Vec<RawTupleMember>,
        has_rest: bool,
    },
    /// A host type the adapter cannot translate. Carries the reason.
    Untranslatable {
        message: String,
    },
}

/// A generic instantiation as reported by the host: the generic
/// target, its name (for well-known recognition) and the supplied
/// arguments. The host type itself is the post-substitution body.
#[derive(Debug, Clone)]
pub struct RawInstantiation {
    pub target: HostTypeId,
    pub target_name: Option<String>,
    pub type_arguments: Vec<HostTypeId>,
}

/// An alias symbol attached to a host type.
#[derive(Debug, Clone)]
pub struct RawAlias {
    pub name: String,
    pub type_parameters: Vec<HostTypeId>,
}

/// What the engine consumes from a host type-checker.
pub trait TypeSource {
    /// Classification and kind-specific shape of a host type.
    fn raw(&self, host: HostTypeId) -> RawType;

    /// The instantiation backing `host`, when `host` is a generic
    /// type with supplied arguments.
    fn instantiation(&self, _host: HostTypeId) -> Option<RawInstantiation> {
        None
    }

    /// The alias symbol attached to `host`, if any.
    fn alias(&self, _host: HostTypeId) -> Option<RawAlias> {
        None
    }

    /// The declaration site of `host`, if known.
    fn declaration(&self, _host: HostTypeId) -> Option<SourceLocation> {
        None
    }

    /// Documentation attached to the declaration of `host`.
    fn documentation(&self, _host: HostTypeId) -> Option<String> {
        None
    }

    /// Whether the declaration of `host` is exported.
    fn is_exported(&self, _host: HostTypeId) -> bool {
        false
    }

    /// The text of an original source file, for source-map embedding.
    /// Return `None` for stdlib files.
    fn source_text(&self, _file: &str) -> Option<String> {
        None
    }
}
