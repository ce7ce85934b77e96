//! Read-only view of a service definition, as handed over by the descriptor
//! collaborator.
//!
//! Nothing in the engine mutates these values; every generation pass only
//! derives strings and token trees from them. Construction helpers exist so
//! descriptor adapters (and tests) can build a view in declaration order.

use prost_types::field_descriptor_proto::Type;

use crate::error::{Error, Result};
use crate::path_template;

/// Marker in [`Binding::explicit_params`] accepting every unbound query key.
pub const WILDCARD: &str = "*";

/// One input translation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Declared file name, e.g. `strings/strings.proto`.
    pub name: String,
    /// Protobuf package, e.g. `my.lovely.strings`.
    pub package: String,
    pub services: Vec<Service>,
    pub imports: Vec<Import>,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            services: Vec::new(),
            imports: Vec::new(),
        }
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    pub fn with_import(mut self, import: Import) -> Self {
        self.imports.push(import);
        self
    }
}

/// A `use` declaration emitted at the top of generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Rust path, e.g. `std::sync::Arc`.
    pub path: String,
    pub alias: Option<String>,
    /// Standard-library imports are grouped before third-party ones.
    pub standard: bool,
}

impl Import {
    pub fn standard(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
            standard: true,
        }
    }

    pub fn third_party(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
            standard: false,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// A named RPC group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub name: String,
    pub methods: Vec<Method>,
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Whether any method of this service is exposed over HTTP.
    pub fn has_bindings(&self) -> bool {
        self.methods.iter().any(|m| !m.bindings.is_empty())
    }
}

/// One RPC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub request_type: TypeRef,
    pub response_type: TypeRef,
    pub bindings: Vec<Binding>,
}

impl Method {
    pub fn new(name: impl Into<String>, request_type: TypeRef, response_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            request_type,
            response_type,
            bindings: Vec::new(),
        }
    }

    /// Append a binding, assigning its index from declaration order.
    pub fn with_binding(mut self, mut binding: Binding) -> Self {
        binding.index = self.bindings.len();
        self.bindings.push(binding);
        self
    }
}

/// Reference to a protobuf message type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub package: String,
    /// Message name relative to the package; nested types are dotted
    /// (`Outer.Inner`).
    pub name: String,
}

impl TypeRef {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn full_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }
}

/// HTTP verbs a binding can be exposed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

/// One HTTP exposure of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Position among the method's bindings; disambiguates generated symbols.
    pub index: usize,
    pub method: HttpMethod,
    pub path_template: String,
    /// Fields bound from path segments, in declaration order.
    pub path_params: Vec<PathParam>,
    /// Field names bound from the query string, possibly [`WILDCARD`].
    pub explicit_params: Vec<String>,
    pub body: Option<Body>,
}

impl Binding {
    pub fn new(method: HttpMethod, path_template: impl Into<String>) -> Self {
        Self {
            index: 0,
            method,
            path_template: path_template.into(),
            path_params: Vec::new(),
            explicit_params: Vec::new(),
            body: None,
        }
    }

    pub fn with_path_param(mut self, field: impl Into<String>, ty: ScalarType) -> Self {
        self.path_params.push(PathParam {
            field: field.into(),
            ty,
        });
        self
    }

    /// Add explicit query params; duplicates are ignored.
    pub fn with_explicit_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.explicit_params.contains(&name) {
                self.explicit_params.push(name);
            }
        }
        self
    }

    pub fn with_wildcard_query(self) -> Self {
        self.with_explicit_params([WILDCARD])
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Derive the path params from the template placeholders, resolving each
    /// against the request message fields.
    ///
    /// Placeholders may address nested fields (`{item.id}`); every
    /// intermediate segment must name a message field and the last one a
    /// scalar.
    pub fn resolve_path_params(mut self, request: &MessageType) -> Result<Self> {
        let mut params = Vec::new();
        for name in path_template::placeholders(&self.path_template) {
            let ty = request.scalar_at(name).map_err(|err| match err {
                FieldLookup::Missing => Error::UnknownPathField {
                    template: self.path_template.clone(),
                    field: name.to_string(),
                },
                FieldLookup::NotScalar => Error::NonScalarField {
                    field: name.to_string(),
                },
            })?;
            params.push(PathParam {
                field: name.to_string(),
                ty,
            });
        }
        self.path_params = params;
        Ok(self)
    }

    pub fn has_wildcard_query(&self) -> bool {
        self.explicit_params.iter().any(|p| p == WILDCARD)
    }
}

/// A field bound from a named path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParam {
    /// Field path in the request message, dotted for nested fields.
    pub field: String,
    pub ty: ScalarType,
}

/// Which part of the request the JSON body populates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Body {
    /// Empty means the whole request message.
    pub field_path: Vec<BodyField>,
}

impl Body {
    /// `body: "*"`.
    pub fn whole() -> Self {
        Self::default()
    }

    /// Body rooted at a single top-level field.
    pub fn field(name: impl Into<String>, message: bool) -> Self {
        Self {
            field_path: vec![BodyField {
                name: name.into(),
                message,
            }],
        }
    }

    pub fn is_whole(&self) -> bool {
        self.field_path.is_empty()
    }

    /// Resolve a dotted body expression against the request message.
    pub fn resolve(expr: &str, request: &MessageType) -> Result<Self> {
        if expr == WILDCARD {
            return Ok(Self::whole());
        }
        let mut field_path = Vec::new();
        let mut fields = request.fields.as_slice();
        for segment in expr.split('.') {
            let field = fields
                .iter()
                .find(|f| f.name == segment)
                .ok_or_else(|| Error::UnknownPathField {
                    template: expr.to_string(),
                    field: segment.to_string(),
                })?;
            field_path.push(BodyField {
                name: field.name.clone(),
                message: field.is_message(),
            });
            fields = field.fields.as_slice();
        }
        Ok(Self { field_path })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyField {
    pub name: String,
    /// Message fields are `Option`-wrapped in prost output.
    pub message: bool,
}

/// Scalar subset of the descriptor field-type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Bytes,
    Uint32,
    Enum,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

impl TryFrom<Type> for ScalarType {
    type Error = Type;

    fn try_from(ty: Type) -> std::result::Result<Self, Type> {
        Ok(match ty {
            Type::Double => ScalarType::Double,
            Type::Float => ScalarType::Float,
            Type::Int64 => ScalarType::Int64,
            Type::Uint64 => ScalarType::Uint64,
            Type::Int32 => ScalarType::Int32,
            Type::Fixed64 => ScalarType::Fixed64,
            Type::Fixed32 => ScalarType::Fixed32,
            Type::Bool => ScalarType::Bool,
            Type::String => ScalarType::String,
            Type::Bytes => ScalarType::Bytes,
            Type::Uint32 => ScalarType::Uint32,
            Type::Enum => ScalarType::Enum,
            Type::Sfixed32 => ScalarType::Sfixed32,
            Type::Sfixed64 => ScalarType::Sfixed64,
            Type::Sint32 => ScalarType::Sint32,
            Type::Sint64 => ScalarType::Sint64,
            Type::Message | Type::Group => return Err(ty),
        })
    }
}

/// Field layout of a request message, used to type path placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageType {
    pub fields: Vec<Field>,
}

impl MessageType {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    fn scalar_at(&self, path: &str) -> std::result::Result<ScalarType, FieldLookup> {
        let mut fields = self.fields.as_slice();
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            let field = fields
                .iter()
                .find(|f| f.name == segment)
                .ok_or(FieldLookup::Missing)?;
            if segments.peek().is_none() {
                return ScalarType::try_from(field.ty).map_err(|_| FieldLookup::NotScalar);
            }
            if !field.is_message() {
                return Err(FieldLookup::Missing);
            }
            fields = field.fields.as_slice();
        }
        Err(FieldLookup::Missing)
    }
}

enum FieldLookup {
    Missing,
    NotScalar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    /// Sub-fields when `ty` is a message.
    pub fields: Vec<Field>,
}

impl Field {
    pub fn scalar(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            fields: Vec::new(),
        }
    }

    pub fn message(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            ty: Type::Message,
            fields,
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(self.ty, Type::Message | Type::Group)
    }
}
