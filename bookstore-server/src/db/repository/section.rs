//! Section Repository
//!
//! Sections form a tree: `parent` on the child, `sections` on the parent.
//! `products` is owned here and mirrored in `Product.sections`.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Product, Section, SectionCreate, SectionUpdate, SectionWithProducts};
use shared::query::ListQuery;
use shared::util::{new_id, now_millis};

use super::{
    ensure_unique, product_sections, require_existing, same_name, section_children,
};
use crate::db::query::paginate;
use crate::db::references::{sync_many, sync_single, unlink_all};
use crate::db::{DocumentStore, Scope, soft_delete};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};

#[derive(Clone)]
pub struct SectionRepository {
    store: DocumentStore,
}

fn name_taken(name: &str) -> AppError {
    AppError::already_exists(format!("Section '{}'", name.trim()))
}

const MAX_DEPTH: usize = 64;

/// Fail if making `parent` the parent of `id` would close a loop
fn ensure_acyclic(scope: &impl Scope, id: &str, parent: &str) -> AppResult<()> {
    let mut cursor = Some(parent.to_string());
    let mut hops = 0usize;
    while let Some(current) = cursor {
        hops += 1;
        if current == id || hops > MAX_DEPTH {
            return Err(AppError::business_rule(ErrorCode::SectionCycle).with_id(id));
        }
        cursor = scope.find::<Section>(&current)?.and_then(|s| s.parent);
    }
    Ok(())
}

impl SectionRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub fn find_all(&self, query: &ListQuery) -> AppResult<Vec<Section>> {
        let items = self.store.read()?.list::<Section>()?;
        Ok(paginate(items, query))
    }

    /// Sections with their active products embedded
    pub fn find_all_with_products(&self, query: &ListQuery) -> AppResult<Vec<SectionWithProducts>> {
        let scope = self.store.read()?;
        let sections = paginate(scope.list::<Section>()?, query);
        sections
            .into_iter()
            .map(|section| {
                let mut products = Vec::with_capacity(section.products.len());
                for id in &section.products {
                    if let Some(product) = scope.find::<Product>(id)? {
                        products.push(product);
                    }
                }
                Ok(SectionWithProducts::new(section, products))
            })
            .collect()
    }

    pub fn find_by_id(&self, id: &str) -> AppResult<Section> {
        self.store.read()?.require(id)
    }

    pub fn create(&self, data: SectionCreate) -> AppResult<Section> {
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;

        let mut scope = self.store.write()?;
        ensure_unique::<Section>(
            &scope,
            None,
            |s| same_name(&s.name, &data.name),
            || name_taken(&data.name),
        )?;

        let now = now_millis();
        let mut section = Section {
            id: new_id(),
            name: data.name.trim().to_string(),
            parent: None,
            sections: Vec::new(),
            products: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        section.parent = sync_single::<Section>(
            &mut scope,
            &section.id,
            None,
            data.parent.as_deref(),
            section_children,
        )?;
        section.products =
            sync_many::<Product>(&mut scope, &section.id, &[], &data.products, product_sections)?;
        scope.save(&section)?;
        scope.commit()?;

        tracing::info!(id = %section.id, name = %section.name, "Section created");
        Ok(section)
    }

    pub fn update(&self, id: &str, data: SectionUpdate) -> AppResult<Section> {
        let mut scope = self.store.write()?;
        let mut section = scope.require::<Section>(id)?;

        if let Some(name) = data.name {
            validate_required_text(&name, "name", MAX_NAME_LEN)?;
            ensure_unique::<Section>(
                &scope,
                Some(id),
                |s| same_name(&s.name, &name),
                || name_taken(&name),
            )?;
            section.name = name.trim().to_string();
        }

        if let Some(parent) = data.parent {
            if let Some(parent_id) = parent.as_deref() {
                ensure_acyclic(&scope, id, parent_id)?;
            }
            section.parent = sync_single::<Section>(
                &mut scope,
                id,
                section.parent.as_deref(),
                parent.as_deref(),
                section_children,
            )?;
        }

        if let Some(products) = data.products {
            section.products =
                sync_many::<Product>(&mut scope, id, &section.products, &products, product_sections)?;
        }

        section.updated_at = now_millis();
        scope.save(&section)?;
        scope.commit()?;
        Ok(section)
    }

    /// Refuses while products remain; child sections move to the top level
    pub fn delete(&self, id: &str) -> AppResult<Section> {
        let mut scope = self.store.write()?;
        let mut section = require_existing::<Section>(&scope, id)?;
        if section.deleted_at.is_some() {
            return Err(AppError::already_removed("Section", id));
        }
        if !section.products.is_empty() {
            return Err(AppError::business_rule(ErrorCode::SectionHasProducts)
                .with_id(id)
                .with_detail("products", section.products.len()));
        }

        let now = now_millis();
        for child_id in &section.sections {
            if let Some(mut child) = scope.find_any::<Section>(child_id)?
                && child.parent.as_deref() == Some(id)
            {
                child.parent = None;
                child.updated_at = now;
                scope.save(&child)?;
            }
        }
        section.sections.clear();

        if let Some(parent) = section.parent.take() {
            unlink_all::<Section>(&mut scope, id, &[parent], section_children)?;
        }

        soft_delete(&mut scope, &mut section)?;
        scope.commit()?;
        Ok(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str, parent: Option<&str>) -> SectionCreate {
        SectionCreate {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            products: vec![],
        }
    }

    #[test]
    fn test_parent_keeps_children_list() {
        let store = DocumentStore::open_in_memory().unwrap();
        let repo = SectionRepository::new(store);
        let root = repo.create(create("Books", None)).unwrap();
        let child = repo.create(create("Fiction", Some(&root.id))).unwrap();

        assert_eq!(child.parent.as_deref(), Some(root.id.as_str()));
        assert_eq!(repo.find_by_id(&root.id).unwrap().sections, vec![child.id.clone()]);

        repo.update(
            &child.id,
            SectionUpdate {
                parent: Some(None),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(repo.find_by_id(&root.id).unwrap().sections.is_empty());
    }

    #[test]
    fn test_cycle_is_rejected() {
        let store = DocumentStore::open_in_memory().unwrap();
        let repo = SectionRepository::new(store);
        let a = repo.create(create("A", None)).unwrap();
        let b = repo.create(create("B", Some(&a.id))).unwrap();

        let err = repo
            .update(
                &a.id,
                SectionUpdate {
                    parent: Some(Some(b.id.clone())),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SectionCycle);
    }

    #[test]
    fn test_duplicate_name_and_missing_parent() {
        let store = DocumentStore::open_in_memory().unwrap();
        let repo = SectionRepository::new(store);
        repo.create(create("Books", None)).unwrap();
        assert_eq!(
            repo.create(create("Books ", None)).unwrap_err().code,
            ErrorCode::AlreadyExists
        );
        assert_eq!(
            repo.create(create("Games", Some("missing"))).unwrap_err().code,
            ErrorCode::NotFound
        );
    }

    #[test]
    fn test_delete_promotes_children() {
        let store = DocumentStore::open_in_memory().unwrap();
        let repo = SectionRepository::new(store);
        let root = repo.create(create("Books", None)).unwrap();
        let child = repo.create(create("Fiction", Some(&root.id))).unwrap();

        repo.delete(&root.id).unwrap();
        assert!(repo.find_by_id(&child.id).unwrap().parent.is_none());
    }
}
