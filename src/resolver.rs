use crate::error::ResolveError;
use crate::openapi::{
    Callback, Components, Example, Header, Link, OpenApi, Parameter, PathItem, Reference,
    ReferenceOr, RequestBody, Response, Schema, SecurityScheme,
};
use crate::types::json_path::unescape_segment;
use crate::{COMPONENTS_FIELD, FRAGMENT_ROOT, PATH_SEPARATOR};
use dashmap::DashMap;
use percent_encoding::percent_decode_str;
use std::collections::{BTreeMap, HashSet};

/// An object kind that has its own registry under `components`.
pub trait Component<E>: Sized {
    /// Name of the registry, e.g. `schemas`.
    const SECTION: &'static str;

    fn registry(components: &Components<E>) -> &BTreeMap<String, ReferenceOr<Self>>;
}

macro_rules! component {
    ($kind:ty, $section:literal, $field:ident) => {
        impl<E> Component<E> for $kind {
            const SECTION: &'static str = $section;

            fn registry(components: &Components<E>) -> &BTreeMap<String, ReferenceOr<Self>> {
                &components.$field
            }
        }
    };
}

component!(Schema, "schemas", schemas);
component!(Response, "responses", responses);
component!(Parameter, "parameters", parameters);
component!(Example, "examples", examples);
component!(RequestBody, "requestBodies", request_bodies);
component!(Header, "headers", headers);
component!(SecurityScheme, "securitySchemes", security_schemes);
component!(Link, "links", links);

impl<E> Component<E> for Callback<E> {
    const SECTION: &'static str = "callbacks";

    fn registry(components: &Components<E>) -> &BTreeMap<String, ReferenceOr<Self>> {
        &components.callbacks
    }
}

impl<E> Component<E> for PathItem<E> {
    const SECTION: &'static str = "pathItems";

    fn registry(components: &Components<E>) -> &BTreeMap<String, ReferenceOr<Self>> {
        &components.path_items
    }
}

/// Resolves [`Reference`] values against the `components` of one document.
///
/// Only local references of the form `#/components/<section>/<name>` are
/// followed. A registry entry may itself be a reference; such chains are
/// followed until a concrete object is found, and a chain that revisits a
/// reference fails with [`ResolveError::CyclicReference`].
///
/// Finished chains are memoized, so a resolver can be shared between threads
/// working on the same document.
pub struct ReferenceResolver<'a, E> {
    document: &'a OpenApi<E>,
    resolved_references: DashMap<(&'static str, String), String>,
}

impl<'a, E> ReferenceResolver<'a, E> {
    pub fn new(document: &'a OpenApi<E>) -> Self {
        Self {
            document,
            resolved_references: DashMap::new(),
        }
    }

    pub fn document(&self) -> &'a OpenApi<E> {
        self.document
    }

    /// Returns the concrete object in `slot`, following its reference if it has one.
    pub fn resolve<'s, T>(&self, slot: &'s ReferenceOr<T>) -> Result<&'s T, ResolveError>
    where
        T: Component<E>,
        'a: 's,
    {
        match slot {
            ReferenceOr::Item(item) => Ok(item),
            ReferenceOr::Reference(reference) => self.resolve_reference(reference),
        }
    }

    pub fn resolve_reference<T>(&self, reference: &Reference) -> Result<&'a T, ResolveError>
    where
        T: Component<E>,
    {
        let key = (T::SECTION, reference.reference.clone());
        if let Some(name) = self.resolved_references.get(&key) {
            if let Some(ReferenceOr::Item(item)) = self.registry::<T>()?.get(name.value()) {
                return Ok(item);
            }
        }

        let mut seen_references = HashSet::new();
        let (name, item) = self.follow::<T>(&reference.reference, &mut seen_references)?;
        log::debug!(
            "Resolved {} to components/{}/{}",
            reference.reference,
            T::SECTION,
            name
        );
        self.resolved_references.insert(key, name);
        Ok(item)
    }

    /// Resolves a reference by its string form.
    pub fn resolve_str<T>(&self, reference: &str) -> Result<&'a T, ResolveError>
    where
        T: Component<E>,
    {
        self.resolve_reference(&Reference::new(reference))
    }

    fn registry<T>(&self) -> Result<&'a BTreeMap<String, ReferenceOr<T>>, ResolveError>
    where
        T: Component<E>,
    {
        match &self.document.components {
            Some(components) => Ok(T::registry(components)),
            None => Err(ResolveError::unresolved(format!(
                "document has no components to hold {}",
                T::SECTION
            ))),
        }
    }

    fn follow<T>(
        &self,
        ref_string: &str,
        seen_references: &mut HashSet<String>,
    ) -> Result<(String, &'a T), ResolveError>
    where
        T: Component<E>,
    {
        if !seen_references.insert(ref_string.to_owned()) {
            return Err(ResolveError::cyclic(ref_string));
        }
        let name = component_name(ref_string, T::SECTION)?;
        match self.registry::<T>()?.get(&name) {
            None => Err(ResolveError::unresolved(format!(
                "{} does not exist",
                ref_string
            ))),
            Some(ReferenceOr::Item(item)) => Ok((name, item)),
            Some(ReferenceOr::Reference(next)) => self.follow::<T>(&next.reference, seen_references),
        }
    }
}

/// Extracts `<name>` from `#/components/<section>/<name>`.
///
/// Each pointer segment is percent-decoded and then unescaped.
pub fn component_name(ref_string: &str, section: &str) -> Result<String, ResolveError> {
    let fragment = match ref_string.strip_prefix(FRAGMENT_ROOT) {
        Some(fragment) => fragment,
        None if ref_string.starts_with('#') => {
            return Err(ResolveError::unresolved(format!(
                "{} is not a JSON pointer fragment",
                ref_string
            )));
        }
        None => return Err(ResolveError::unsupported(ref_string)),
    };

    let mut segments = Vec::new();
    for segment in fragment.split(PATH_SEPARATOR) {
        let decoded = percent_decode_str(segment)
            .decode_utf8()
            .map_err(|_| ResolveError::unresolved(format!("{} is not valid UTF-8", ref_string)))?;
        segments.push(unescape_segment(&decoded));
    }

    match segments.as_slice() {
        [root, found_section, name] if root == COMPONENTS_FIELD && !name.is_empty() => {
            if found_section == section {
                Ok(name.clone())
            } else {
                Err(ResolveError::unresolved(format!(
                    "{} points into components/{}, expected components/{}",
                    ref_string, found_section, section
                )))
            }
        }
        _ => Err(ResolveError::unresolved(format!(
            "{} is not of the form #/components/{}/<name>",
            ref_string, section
        ))),
    }
}
