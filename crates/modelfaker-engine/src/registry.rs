use std::collections::{BTreeMap, BTreeSet};

use crate::declaration::{DeclarationId, FakerDeclaration};
use crate::errors::ConfigurationError;

/// Every known faker declaration, keyed by id.
///
/// Dependencies are resolved when the registry is built: an unknown
/// dependency or a dependency cycle is rejected there, so running a
/// declaration can recurse into its dependencies without further checks.
#[derive(Debug, Default)]
pub struct FakerRegistry {
    declarations: BTreeMap<DeclarationId, FakerDeclaration>,
    order: Vec<DeclarationId>,
}

impl FakerRegistry {
    pub fn build(
        declarations: impl IntoIterator<Item = FakerDeclaration>,
    ) -> Result<Self, ConfigurationError> {
        let mut by_id = BTreeMap::new();
        for declaration in declarations {
            let id = declaration.id().clone();
            if by_id.contains_key(&id) {
                return Err(ConfigurationError::DuplicateDeclaration(id));
            }
            by_id.insert(id, declaration);
        }

        for declaration in by_id.values() {
            for dependency in declaration.dependencies() {
                if !by_id.contains_key(dependency) {
                    return Err(ConfigurationError::UnknownDependency {
                        declaration: declaration.id().clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }

        let order = dependency_order(&by_id).map_err(ConfigurationError::DependencyCycle)?;
        Ok(Self {
            declarations: by_id,
            order,
        })
    }

    pub fn get(&self, id: &DeclarationId) -> Option<&FakerDeclaration> {
        self.declarations.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &DeclarationId) -> Option<&mut FakerDeclaration> {
        self.declarations.get_mut(id)
    }

    pub fn contains(&self, id: &DeclarationId) -> bool {
        self.declarations.contains_key(id)
    }

    /// Ids sorted by app, then name.
    pub fn ids(&self) -> impl Iterator<Item = &DeclarationId> {
        self.declarations.keys()
    }

    /// Ids ordered so that every declaration follows its dependencies.
    pub fn dependency_order(&self) -> &[DeclarationId] {
        &self.order
    }

    pub fn has_run(&self, id: &DeclarationId) -> bool {
        self.get(id).is_some_and(FakerDeclaration::has_run)
    }

    /// Re-arms every declaration so the next run executes again.
    pub fn reset(&mut self) {
        for declaration in self.declarations.values_mut() {
            declaration.rearm();
        }
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Kahn's algorithm over dependency -> dependent edges; the ready set is a
/// `BTreeSet` so ties resolve by id. Returns the ids stuck in a cycle on
/// failure.
fn dependency_order(
    declarations: &BTreeMap<DeclarationId, FakerDeclaration>,
) -> Result<Vec<DeclarationId>, Vec<DeclarationId>> {
    let mut dependents: BTreeMap<&DeclarationId, BTreeSet<&DeclarationId>> = BTreeMap::new();
    let mut indegree: BTreeMap<&DeclarationId, usize> = BTreeMap::new();

    for (id, declaration) in declarations {
        indegree.entry(id).or_insert(0);
        let unique: BTreeSet<&DeclarationId> = declaration.dependencies().iter().collect();
        for dependency in unique {
            dependents.entry(dependency).or_default().insert(id);
            *indegree.entry(id).or_insert(0) += 1;
        }
    }

    let mut ready: BTreeSet<&DeclarationId> = indegree
        .iter()
        .filter_map(|(id, count)| (*count == 0).then_some(*id))
        .collect();
    let mut order = Vec::with_capacity(declarations.len());

    while let Some(id) = ready.pop_first() {
        order.push(id.clone());
        if let Some(targets) = dependents.get(id) {
            for target in targets {
                if let Some(count) = indegree.get_mut(target) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert(*target);
                    }
                }
            }
        }
    }

    if order.len() == declarations.len() {
        Ok(order)
    } else {
        Err(indegree
            .into_iter()
            .filter_map(|(id, count)| (count > 0).then(|| id.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faker(name: &str) -> FakerDeclaration {
        FakerDeclaration::new("app", name).target(name)
    }

    fn id(name: &str) -> DeclarationId {
        DeclarationId::new("app", name)
    }

    #[test]
    fn orders_dependencies_first() {
        let registry = FakerRegistry::build([
            faker("A").depends_on(id("B")).depends_on(id("C")),
            faker("B").depends_on(id("C")),
            faker("C"),
        ])
        .expect("registry");
        assert_eq!(registry.dependency_order(), [id("C"), id("B"), id("A")]);
    }

    #[test]
    fn rejects_duplicates_and_unknown_dependencies() {
        let duplicate = FakerRegistry::build([faker("A"), faker("A")]);
        assert!(matches!(
            duplicate,
            Err(ConfigurationError::DuplicateDeclaration(dup)) if dup == id("A")
        ));

        let unknown = FakerRegistry::build([faker("A").depends_on(id("Missing"))]);
        assert!(matches!(
            unknown,
            Err(ConfigurationError::UnknownDependency { dependency, .. }) if dependency == id("Missing")
        ));
    }

    #[test]
    fn rejects_cycles() {
        let cycle = FakerRegistry::build([
            faker("A").depends_on(id("B")),
            faker("B").depends_on(id("A")),
            faker("C"),
        ]);
        assert!(matches!(
            cycle,
            Err(ConfigurationError::DependencyCycle(ids)) if ids == vec![id("A"), id("B")]
        ));

        let self_loop = FakerRegistry::build([faker("A").depends_on(id("A"))]);
        assert!(matches!(
            self_loop,
            Err(ConfigurationError::DependencyCycle(_))
        ));
    }
}
