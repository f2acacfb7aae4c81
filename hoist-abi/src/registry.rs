use std::collections::HashMap;

use crate::{aapcs64, Binding, CallConv, CallingConvention};

/// Maps ABI tags to descriptor factories.
///
/// Construct one at startup and thread it through the pipeline. The
/// default registry knows the AAPCS64 factory; consumers targeting other
/// architectures register their own. Registration is last-writer-wins per
/// tag; creating a descriptor for an unregistered tag yields `None` rather
/// than an error, because an unknown ABI merely means the recovery passes
/// run without register-role hints.
pub struct CallConvRegistry<B: Binding> {
    factories: HashMap<CallConv, fn(&B) -> CallingConvention>,
}

impl<B: Binding> Default for CallConvRegistry<B> {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(CallConv::Arm64, aapcs64);
        registry
    }
}

impl<B: Binding> CallConvRegistry<B> {
    /// A registry with no factories at all.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register (or replace) the factory for a tag.
    pub fn register(&mut self, tag: CallConv, factory: fn(&B) -> CallingConvention) {
        self.factories.insert(tag, factory);
    }

    /// Whether a tag has a factory.
    pub fn is_registered(&self, tag: CallConv) -> bool {
        self.factories.contains_key(&tag)
    }

    /// Construct a descriptor for `tag` bound to `binding`.
    pub fn create(&self, tag: CallConv, binding: &B) -> Option<CallingConvention> {
        self.factories.get(&tag).map(|factory| factory(binding))
    }
}

impl<B: Binding> core::fmt::Debug for CallConvRegistry<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut tags: Vec<_> = self.factories.keys().collect();
        tags.sort();
        f.debug_struct("CallConvRegistry")
            .field("registered", &tags)
            .finish()
    }
}
