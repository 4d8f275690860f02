use rand::Rng;
use tracing::debug;

use specimen_core::{Constructor, TypeDef, Value};

use crate::engine::GenerationContext;
use crate::errors::GenerationError;
use crate::model::ConstructorPolicy;

impl<'a> GenerationContext<'a> {
    /// Build a concrete type from one of its constructors. Parameters are one
    /// structural layer deeper than the instance itself.
    pub(crate) fn instantiate(
        &mut self,
        def: &'a TypeDef,
        depth: usize,
    ) -> Result<Value, GenerationError> {
        if !self.catalog.is_eligible(&def.name) {
            return Err(GenerationError::NotEligible(def.name.clone()));
        }

        let (index, constructor) = self.select_constructor(def)?;
        let mut args = Vec::with_capacity(constructor.arity());
        for param in constructor.params() {
            args.push(self.generate_value(&param.ty, depth + 1)?);
        }

        let value = constructor
            .invoke(&def.name, args)
            .map_err(|source| GenerationError::ConstructionFailed {
                type_name: def.name.clone(),
                constructor: index,
                source,
            })?;

        debug!(
            type_name = %def.name,
            constructor = index,
            arity = constructor.arity(),
            depth,
            "instance built"
        );
        self.report.record_structural(&def.name, depth);
        Ok(value)
    }

    fn select_constructor(
        &mut self,
        def: &'a TypeDef,
    ) -> Result<(usize, &'a Constructor), GenerationError> {
        if def.constructors.is_empty() {
            return Err(GenerationError::NoConstructorAvailable(def.name.clone()));
        }

        let candidates: Vec<usize> = match self.options.constructor_policy {
            ConstructorPolicy::Uniform => (0..def.constructors.len()).collect(),
            ConstructorPolicy::WidestArity => {
                let widest = def
                    .constructors
                    .iter()
                    .map(Constructor::arity)
                    .max()
                    .unwrap_or(0);
                def.constructors
                    .iter()
                    .enumerate()
                    .filter(|(_, constructor)| constructor.arity() == widest)
                    .map(|(index, _)| index)
                    .collect()
            }
        };

        let index = candidates[self.rng.random_range(0..candidates.len())];
        Ok((index, &def.constructors[index]))
    }
}
