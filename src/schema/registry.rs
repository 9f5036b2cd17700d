//! Materialization of declarations into a [`SchemaType`].
//!
//! Registration is depth-first: resolving a reference to a declared but not
//! yet registered type registers it on the spot. A placeholder holding the
//! type's name and kind is inserted before its members are built, so that
//! cycles resolve to the placeholder's [`TypeId`] instead of recursing.

use std::{mem, sync::Arc};

use arcstr::ArcStr;
use fnv::{FnvHashMap, FnvHashSet};
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::{
    ast::{self, TypeParseError},
    executor::{FieldError, Resolver},
    introspection,
    schema::{
        builder::{
            ArgumentBuilder, DirectiveBuilder, EnumBuilder, FieldBuilder, InputObjectBuilder,
            InterfaceBuilder, ObjectBuilder, ScalarBuilder, TypeBuilder, UnionBuilder,
        },
        error::{BuildError, BuildErrorKind, BuildErrors, PathElement},
        meta::{
            Argument, DecodeFn, DeprecationStatus, EncodeFn, EnumMeta, EnumValue, Field,
            InputObjectMeta, InterfaceMeta, MetaType, ObjectMeta, PlaceholderMeta, ScalarMeta,
            UnionMeta, UnwrapFn,
        },
        model::{DirectiveType, SchemaType, TypeId, TypeRef},
    },
    types::{
        base::TypeKind,
        input::{InputDecoder, decode_all_fields},
        scalars::host_str,
    },
    value::{HostValue, LiteralValue},
};

/// Registration state of a single build.
pub(crate) struct Registry {
    declared: FnvHashMap<ArcStr, TypeBuilder>,
    order: Vec<ArcStr>,
    types: IndexMap<ArcStr, MetaType>,
    errors: Vec<BuildError>,
    path: Vec<PathElement>,
}

impl Registry {
    pub(crate) fn new(declared: IndexMap<ArcStr, TypeBuilder>) -> Self {
        let order = declared.keys().cloned().collect();
        Self {
            declared: declared.into_iter().collect(),
            order,
            types: IndexMap::new(),
            errors: Vec::new(),
            path: Vec::new(),
        }
    }

    pub(crate) fn build(
        mut self,
        description: Option<ArcStr>,
        query_type: Option<ArcStr>,
        directives: Vec<DirectiveBuilder>,
        introspection: bool,
    ) -> Result<SchemaType, BuildErrors> {
        debug!(declared = self.order.len(), "registering types");
        for name in mem::take(&mut self.order) {
            if self.declared.contains_key(&name) {
                self.register(&name);
            }
        }

        debug!(types = self.types.len(), "linking interfaces");
        self.link_interfaces();

        debug!(directives = directives.len(), "registering directives");
        let directives = self.register_directives(directives);

        let query_type = self.resolve_query_type(query_type);
        if let (Some(id), true) = (query_type, introspection) {
            self.graft_introspection(id);
        }

        if !self.errors.is_empty() {
            debug!(errors = self.errors.len(), "schema build failed");
            return Err(BuildErrors(self.errors));
        }
        let Some(query_type) = query_type else {
            return Err(BuildErrors(vec![BuildError::new(
                vec![],
                BuildErrorKind::MissingQueryType,
            )]));
        };
        Ok(SchemaType {
            description,
            types: self.types,
            query_type,
            directives,
            introspection,
        })
    }

    fn error(&mut self, kind: BuildErrorKind) {
        self.errors.push(BuildError::new(self.path.clone(), kind));
    }

    /// Runs `f` with `element` appended to the current path.
    fn within<R>(&mut self, element: PathElement, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(element);
        let result = f(self);
        self.path.pop();
        result
    }

    /// Registers a declared type, unless already registered.
    fn register(&mut self, name: &str) -> Option<TypeId> {
        if let Some(index) = self.types.get_index_of(name) {
            return Some(TypeId(index));
        }
        let builder = self.declared.remove(name)?;
        let name = builder.name().clone();
        trace!(type_name = %name, kind = %builder.kind(), "registering type");

        let (index, _) = self.types.insert_full(
            name.clone(),
            MetaType::Placeholder(PlaceholderMeta {
                name,
                kind: builder.kind(),
            }),
        );
        let outer = mem::replace(&mut self.path, vec![builder.path_element()]);
        let meta = match builder {
            TypeBuilder::Scalar(s) => MetaType::Scalar(Self::build_scalar(s)),
            TypeBuilder::Enum(e) => MetaType::Enum(self.build_enum(e)),
            TypeBuilder::Object(o) => MetaType::Object(self.build_object(o)),
            TypeBuilder::Interface(i) => MetaType::Interface(self.build_interface(i)),
            TypeBuilder::Union(u) => MetaType::Union(self.build_union(u)),
            TypeBuilder::InputObject(io) => MetaType::InputObject(self.build_input_object(io)),
        };
        self.path = outer;
        self.types[index] = meta;
        Some(TypeId(index))
    }

    fn resolve_named(&mut self, name: &str) -> Option<TypeId> {
        let id = self.register(name);
        if id.is_none() {
            self.error(BuildErrorKind::UnknownType(name.into()));
        }
        id
    }

    fn resolve_type(&mut self, ty: &Result<ast::Type, TypeParseError>) -> Option<TypeRef> {
        match ty {
            Ok(ty) => self.resolve_literal(ty),
            Err(e) => {
                self.error(BuildErrorKind::InvalidTypeLiteral(e.clone()));
                None
            }
        }
    }

    fn resolve_literal(&mut self, ty: &ast::Type) -> Option<TypeRef> {
        Some(match ty {
            ast::Type::NamedType(name) => TypeRef::Named(self.resolve_named(name)?),
            ast::Type::ListType(inner) => TypeRef::List(Box::new(self.resolve_literal(inner)?)),
            ast::Type::NonNullType(inner) => {
                if matches!(**inner, ast::Type::NonNullType(_)) {
                    self.error(BuildErrorKind::DoubleNonNull(ast::print_type(ty)));
                    return None;
                }
                TypeRef::NonNull(Box::new(self.resolve_literal(inner)?))
            }
        })
    }

    fn kind_of(&self, id: TypeId) -> TypeKind {
        self.types[id.0].type_kind()
    }

    fn build_scalar(s: ScalarBuilder) -> ScalarMeta {
        ScalarMeta {
            name: s.name,
            description: s.description,
            directives: s.directives,
            specified_by_url: s.specified_by_url,
            encode_fn: s.encode,
            decode_fn: s.decode,
            list_factory: s.list_factory,
        }
    }

    fn build_enum(&mut self, e: EnumBuilder) -> EnumMeta {
        let mut values = IndexMap::with_capacity(e.values.len());
        for v in e.values {
            let name = v.name.clone();
            self.within(PathElement::EnumValue(name.clone()), |this| {
                if name.starts_with("__") {
                    this.error(BuildErrorKind::ReservedName(name.clone()));
                } else if values.contains_key(&name) {
                    this.error(BuildErrorKind::DuplicateEnumValue(name.clone()));
                } else {
                    values.insert(
                        name,
                        Arc::new(EnumValue {
                            name: v.name,
                            description: v.description,
                            deprecation_status: DeprecationStatus::from_directives(&v.directives),
                            directives: v.directives,
                        }),
                    );
                }
            });
        }
        EnumMeta {
            name: e.name,
            description: e.description,
            directives: e.directives,
            values,
            encode_fn: e.encode.unwrap_or_else(default_enum_encode),
            decode_fn: e.decode.unwrap_or_else(default_enum_decode),
        }
    }

    fn build_object(&mut self, o: ObjectBuilder) -> ObjectMeta {
        let mut fields = self.build_fields(o.fields);
        let name = o.name.clone();
        let typename = FieldBuilder::new(
            "__typename",
            "String!",
            Resolver::simple(move |_| Ok::<_, FieldError>(HostValue::new(name.clone()))).safe(),
        );
        if let Some(f) = self.build_field(typename) {
            fields.insert(f.name.clone(), Arc::new(f));
        }

        let mut interface_names = Vec::with_capacity(o.interfaces.len());
        for i in o.interfaces {
            if !interface_names.contains(&i) {
                interface_names.push(i);
            }
        }
        ObjectMeta {
            name: o.name,
            description: o.description,
            directives: o.directives,
            fields,
            interface_names,
            interfaces: Vec::new(),
        }
    }

    fn build_interface(&mut self, i: InterfaceBuilder) -> InterfaceMeta {
        let mut fields = self.build_fields(i.fields);
        let unwrap_fn = i.unwrap.unwrap_or_else(|| default_unwrap(i.name.clone()));
        let unwrap = unwrap_fn.clone();
        let typename = FieldBuilder::new(
            "__typename",
            "String!",
            Resolver::with_context(move |ctx, v| {
                unwrap(ctx, v).map(|(_, type_name)| HostValue::new(type_name))
            }),
        );
        if let Some(f) = self.build_field(typename) {
            fields.insert(f.name.clone(), Arc::new(f));
        }
        InterfaceMeta {
            name: i.name,
            description: i.description,
            directives: i.directives,
            fields,
            implementors: Vec::new(),
            unwrap_fn,
        }
    }

    fn build_union(&mut self, u: UnionBuilder) -> UnionMeta {
        let mut members = Vec::with_capacity(u.members.len());
        for name in &u.members {
            self.within(PathElement::Member(name.clone()), |this| {
                let Some(id) = this.resolve_named(name) else {
                    return;
                };
                if this.kind_of(id) != TypeKind::Object {
                    this.error(BuildErrorKind::UnionMemberNotObject(name.clone()));
                } else if !members.contains(&id) {
                    members.push(id);
                }
            });
        }
        UnionMeta {
            unwrap_fn: u.unwrap.unwrap_or_else(|| default_unwrap(u.name.clone())),
            name: u.name,
            description: u.description,
            directives: u.directives,
            members,
        }
    }

    fn build_input_object(&mut self, io: InputObjectBuilder) -> InputObjectMeta {
        let mut input_fields = IndexMap::with_capacity(io.fields.len());
        for f in io.fields {
            let name = f.name.clone();
            self.within(PathElement::Field(name.clone()), |this| {
                if name.starts_with("__") {
                    this.error(BuildErrorKind::ReservedName(name));
                } else if input_fields.contains_key(&name) {
                    this.error(BuildErrorKind::DuplicateField(name));
                } else if let Some(arg) = this.build_argument(f) {
                    input_fields.insert(name, Arc::new(arg));
                }
            });
        }
        InputObjectMeta {
            name: io.name,
            description: io.description,
            directives: io.directives,
            input_fields,
            decode_fn: io.decode.unwrap_or_else(|| Arc::new(decode_all_fields)),
            list_factory: io.list_factory,
        }
    }

    fn build_fields(&mut self, builders: Vec<FieldBuilder>) -> IndexMap<ArcStr, Arc<Field>> {
        let mut fields = IndexMap::with_capacity(builders.len() + 1);
        for f in builders {
            let name = f.name.clone();
            self.within(PathElement::Field(name.clone()), |this| {
                if name.starts_with("__") {
                    this.error(BuildErrorKind::ReservedName(name));
                } else if fields.contains_key(&name) {
                    this.error(BuildErrorKind::DuplicateField(name));
                } else if let Some(field) = this.build_field_here(f) {
                    fields.insert(name, Arc::new(field));
                }
            });
        }
        fields
    }

    fn build_field(&mut self, f: FieldBuilder) -> Option<Field> {
        self.within(PathElement::Field(f.name.clone()), |this| this.build_field_here(f))
    }

    /// Builds a field, with the path already pointing at it.
    fn build_field_here(&mut self, f: FieldBuilder) -> Option<Field> {
        let arguments = self.build_arguments(f.arguments);
        let field_type = self.resolve_type(&f.field_type)?;
        if self.kind_of(field_type.innermost()) == TypeKind::InputObject {
            let declared = f.field_type.as_ref().map(ast::print_type).unwrap_or_default();
            self.error(BuildErrorKind::NotOutputType(declared));
            return None;
        }
        Some(Field {
            name: f.name,
            description: f.description,
            deprecation_status: DeprecationStatus::from_directives(&f.directives),
            directives: f.directives,
            arguments: arguments?,
            field_type,
            resolver: f.resolver,
        })
    }

    /// Builds arguments in declaration order.
    ///
    /// Returns [`None`] if any of them failed, after reporting all failures.
    fn build_arguments(&mut self, builders: Vec<ArgumentBuilder>) -> Option<Vec<Arc<Argument>>> {
        let mut seen = FnvHashSet::default();
        let mut arguments = Vec::with_capacity(builders.len());
        let mut failed = false;
        for a in builders {
            let name = a.name.clone();
            let built = self.within(PathElement::Argument(name.clone()), |this| {
                if name.starts_with("__") {
                    this.error(BuildErrorKind::ReservedName(name.clone()));
                    None
                } else if !seen.insert(name.clone()) {
                    this.error(BuildErrorKind::DuplicateArgument(name.clone()));
                    None
                } else {
                    this.build_argument(a)
                }
            });
            match built {
                Some(arg) => arguments.push(Arc::new(arg)),
                None => failed = true,
            }
        }
        (!failed).then_some(arguments)
    }

    /// Builds an argument or input field, with the path already pointing at
    /// it.
    fn build_argument(&mut self, a: ArgumentBuilder) -> Option<Argument> {
        let arg_type = self.resolve_type(&a.arg_type)?;
        let types = &self.types;
        let decoder = match InputDecoder::compile(&arg_type, |id| types[id.0].type_kind()) {
            Ok(decoder) => decoder,
            Err(kind) => {
                let ty = a.arg_type.as_ref().map(ast::print_type).unwrap_or_default();
                self.error(BuildErrorKind::NotInputType { ty, kind });
                return None;
            }
        };
        Some(Argument {
            name: a.name,
            description: a.description,
            directives: a.directives,
            arg_type,
            default_value: a.default_value,
            decoder,
        })
    }

    /// Back-links objects to the interfaces they implement.
    fn link_interfaces(&mut self) {
        let mut links = Vec::new();
        for (index, ty) in self.types.values().enumerate() {
            if let MetaType::Object(o) = ty {
                for name in &o.interface_names {
                    links.push((TypeId(index), o.name.clone(), name.clone()));
                }
            }
        }

        for (object, object_name, interface_name) in links {
            self.path = vec![
                PathElement::Object(object_name),
                PathElement::Implements(interface_name.clone()),
            ];
            let Some(index) = self.types.get_index_of(&interface_name) else {
                self.error(BuildErrorKind::UnknownType(interface_name));
                continue;
            };
            if self.kind_of(TypeId(index)) != TypeKind::Interface {
                self.error(BuildErrorKind::NotAnInterface(interface_name));
                continue;
            }
            if let MetaType::Interface(i) = &mut self.types[index] {
                i.implementors.push(object);
            }
            if let MetaType::Object(o) = &mut self.types[object.0] {
                o.interfaces.push(TypeId(index));
            }
        }
        self.path.clear();
    }

    fn register_directives(
        &mut self,
        builders: Vec<DirectiveBuilder>,
    ) -> IndexMap<ArcStr, Arc<DirectiveType>> {
        let mut directives = IndexMap::with_capacity(builders.len());
        for d in builders {
            self.path = vec![PathElement::Directive(d.name.clone())];
            if directives.contains_key(&d.name) {
                self.error(BuildErrorKind::DuplicateDirective(d.name));
                continue;
            }
            trace!(directive = %d.name, "registering directive");
            let Some(arguments) = self.build_arguments(d.arguments) else {
                continue;
            };
            directives.insert(
                d.name.clone(),
                Arc::new(DirectiveType {
                    name: d.name,
                    description: d.description,
                    locations: d.locations,
                    arguments,
                    is_repeatable: d.repeatable,
                    builtin: d.builtin,
                }),
            );
        }
        self.path.clear();
        directives
    }

    fn resolve_query_type(&mut self, name: Option<ArcStr>) -> Option<TypeId> {
        let Some(name) = name else {
            self.error(BuildErrorKind::MissingQueryType);
            return None;
        };
        let id = self.resolve_named(&name)?;
        if self.kind_of(id) != TypeKind::Object {
            self.error(BuildErrorKind::QueryTypeNotObject(name));
            return None;
        }
        Some(id)
    }

    /// Attaches `__schema` and `__type` to the query type.
    fn graft_introspection(&mut self, query_type: TypeId) {
        self.path = vec![PathElement::Object(self.types[query_type.0].name().clone())];
        let fields = introspection::root_fields()
            .into_iter()
            .filter_map(|f| self.build_field(f))
            .collect::<Vec<_>>();
        self.path.clear();
        if let MetaType::Object(o) = &mut self.types[query_type.0] {
            for f in fields {
                o.fields.insert(f.name.clone(), Arc::new(f));
            }
        }
    }
}

fn default_enum_encode() -> EncodeFn {
    Arc::new(|_, v| {
        if v.is_null() {
            return Ok(LiteralValue::Null);
        }
        host_str(v)
            .map(LiteralValue::from)
            .ok_or_else(|| format!("Cannot encode {v:?} as an enum value").into())
    })
}

fn default_enum_decode() -> DecodeFn {
    Arc::new(|_, v| {
        Ok(match v {
            LiteralValue::String(s) => HostValue::new(s.clone()),
            _ => HostValue::null(),
        })
    })
}

fn default_unwrap(abstract_type: ArcStr) -> UnwrapFn {
    Arc::new(move |_, v| {
        v.as_typed()
            .map(|t| (t.value.clone(), t.type_name.clone()))
            .ok_or_else(|| {
                format!("Cannot determine the concrete type of {v:?} for \"{abstract_type}\"")
                    .into()
            })
    })
}
