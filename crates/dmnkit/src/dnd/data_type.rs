//! Data types and the hierarchy they form.
//!
//! A [`DataType`] wraps an [`ItemDefinition`] with a session-unique uuid, and
//! nests its item components as sub data types. The [`DataTypeTree`] holds
//! the top-level data types of a document and implements the structural
//! edits a drop turns into.

use uuid::Uuid;

use dmnkit_core::dmn::{ItemDefinition, RawElement};

use super::DndError;

/// Separator of the names in a data type hash.
const HASH_SEPARATOR: &str = ".";

#[derive(Debug, Clone, PartialEq)]
pub struct DataType {
    uuid: String,
    definition: ItemDefinition,
    sub_data_types: Vec<DataType>,
}

impl DataType {
    pub fn new(name: impl Into<String>, type_ref: Option<String>) -> Self {
        Self::from_item_definition(ItemDefinition {
            name: name.into(),
            type_ref,
            ..Default::default()
        })
    }

    /// Wraps `definition`, turning its item components into sub data types.
    pub fn from_item_definition(mut definition: ItemDefinition) -> Self {
        let components = std::mem::take(&mut definition.item_components);
        let read_only = definition.read_only;
        let sub_data_types = components
            .into_iter()
            .map(|mut component| {
                component.read_only |= read_only;
                Self::from_item_definition(component)
            })
            .collect();

        Self {
            uuid: Uuid::new_v4().to_string(),
            definition,
            sub_data_types,
        }
    }

    pub fn to_item_definition(&self) -> ItemDefinition {
        ItemDefinition {
            item_components: self
                .sub_data_types
                .iter()
                .map(Self::to_item_definition)
                .collect(),
            ..self.definition.clone()
        }
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = uuid.into();
        self
    }

    pub fn with_sub_data_types(mut self, sub_data_types: Vec<DataType>) -> Self {
        self.sub_data_types = sub_data_types;
        self
    }

    pub fn with_list(mut self, is_list: bool) -> Self {
        self.definition.is_collection = is_list;
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.definition.read_only = read_only;
        self
    }

    pub fn with_constraint(mut self, constraint: Option<RawElement>) -> Self {
        self.definition.allowed_values = constraint;
        self
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn type_ref(&self) -> Option<&str> {
        self.definition.type_ref.as_deref()
    }

    pub fn constraint(&self) -> Option<&RawElement> {
        self.definition.allowed_values.as_ref()
    }

    pub fn is_list(&self) -> bool {
        self.definition.is_collection
    }

    pub fn is_read_only(&self) -> bool {
        self.definition.read_only
    }

    pub fn sub_data_types(&self) -> &[DataType] {
        &self.sub_data_types
    }

    pub fn has_sub_data_types(&self) -> bool {
        !self.sub_data_types.is_empty()
    }

    /// Whether `uuid` names this data type or one nested in it.
    pub fn contains(&self, uuid: &str) -> bool {
        self.uuid == uuid || self.sub_data_types.iter().any(|sub| sub.contains(uuid))
    }
}

/// Top-level data types and their nesting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTypeTree {
    data_types: Vec<DataType>,
}

impl DataTypeTree {
    pub fn new(data_types: Vec<DataType>) -> Self {
        Self { data_types }
    }

    pub fn from_item_definitions(definitions: &[ItemDefinition]) -> Self {
        Self::new(
            definitions
                .iter()
                .cloned()
                .map(DataType::from_item_definition)
                .collect(),
        )
    }

    pub fn to_item_definitions(&self) -> Vec<ItemDefinition> {
        self.data_types
            .iter()
            .map(DataType::to_item_definition)
            .collect()
    }

    pub fn data_types(&self) -> &[DataType] {
        &self.data_types
    }

    pub fn is_empty(&self) -> bool {
        self.data_types.is_empty()
    }

    /// Every data type, depth first, with its nesting level.
    pub fn flatten(&self) -> Vec<(&DataType, usize)> {
        fn visit<'a>(
            data_types: &'a [DataType],
            level: usize,
            out: &mut Vec<(&'a DataType, usize)>,
        ) {
            for data_type in data_types {
                out.push((data_type, level));
                visit(&data_type.sub_data_types, level + 1, out);
            }
        }

        let mut out = Vec::new();
        visit(&self.data_types, 0, &mut out);
        out
    }

    pub fn find(&self, uuid: &str) -> Option<&DataType> {
        let path = self.path_of(uuid)?;
        self.at_path(&path)
    }

    /// The uuid of the data type `uuid` is nested in, if it is nested.
    pub fn parent_uuid(&self, uuid: &str) -> Option<&str> {
        let path = self.path_of(uuid)?;
        let (_, parent_path) = path.split_last()?;
        if parent_path.is_empty() {
            return None;
        }
        self.at_path(parent_path).map(DataType::uuid)
    }

    /// The names from the top-level ancestor down to `uuid`, joined by `.`.
    pub fn calculate_hash(&self, uuid: &str) -> Option<String> {
        let path = self.path_of(uuid)?;
        let mut names = Vec::with_capacity(path.len());
        let mut level = self.data_types.as_slice();
        for index in path {
            let data_type = level.get(index)?;
            names.push(data_type.name());
            level = &data_type.sub_data_types;
        }
        Some(names.join(HASH_SEPARATOR))
    }

    /// The first data type, depth first, whose hash is `hash`.
    pub fn find_by_hash(&self, hash: &str) -> Option<&DataType> {
        self.flatten()
            .into_iter()
            .map(|(data_type, _)| data_type)
            .find(|data_type| self.calculate_hash(data_type.uuid()).as_deref() == Some(hash))
    }

    /// Detaches `uuid` and everything nested in it.
    pub fn remove(&mut self, uuid: &str) -> Option<DataType> {
        let path = self.path_of(uuid)?;
        let (index, parent_path) = path.split_last()?;
        let siblings = self.siblings_mut(parent_path)?;
        Some(siblings.remove(*index))
    }

    /// Inserts `data_type` as the first sub data type of `parent`.
    pub fn insert_nested(&mut self, parent: &str, data_type: DataType) -> Result<(), DndError> {
        let path = self
            .path_of(parent)
            .ok_or_else(|| DndError::DataTypeNotFound(parent.to_string()))?;
        let parent_type = self
            .at_path_mut(&path)
            .ok_or_else(|| DndError::DataTypeNotFound(parent.to_string()))?;
        if parent_type.is_read_only() {
            return Err(DndError::ReadOnly(parent_type.name().to_string()));
        }
        parent_type.sub_data_types.insert(0, data_type);
        Ok(())
    }

    /// Inserts `data_type` right below `reference`, under the same parent.
    pub fn insert_below(&mut self, reference: &str, data_type: DataType) -> Result<(), DndError> {
        let path = self
            .path_of(reference)
            .ok_or_else(|| DndError::DataTypeNotFound(reference.to_string()))?;
        let (index, parent_path) = path
            .split_last()
            .ok_or_else(|| DndError::DataTypeNotFound(reference.to_string()))?;
        if let Some(parent) = self.at_path(parent_path).filter(|parent| parent.is_read_only()) {
            return Err(DndError::ReadOnly(parent.name().to_string()));
        }
        let siblings = self
            .siblings_mut(parent_path)
            .ok_or_else(|| DndError::DataTypeNotFound(reference.to_string()))?;
        siblings.insert(index + 1, data_type);
        Ok(())
    }

    /// Inserts `data_type` at the top level, right below the top-level
    /// ancestor of `reference`.
    pub fn insert_top_level_below(
        &mut self,
        reference: &str,
        data_type: DataType,
    ) -> Result<(), DndError> {
        let index = self
            .path_of(reference)
            .and_then(|path| path.first().copied())
            .ok_or_else(|| DndError::DataTypeNotFound(reference.to_string()))?;
        self.data_types.insert(index + 1, data_type);
        Ok(())
    }

    pub fn insert_at_the_top(&mut self, data_type: DataType) {
        self.data_types.insert(0, data_type);
    }

    fn path_of(&self, uuid: &str) -> Option<Vec<usize>> {
        fn search(data_types: &[DataType], uuid: &str, path: &mut Vec<usize>) -> bool {
            for (index, data_type) in data_types.iter().enumerate() {
                path.push(index);
                if data_type.uuid == uuid || search(&data_type.sub_data_types, uuid, path) {
                    return true;
                }
                path.pop();
            }
            false
        }

        let mut path = Vec::new();
        search(&self.data_types, uuid, &mut path).then_some(path)
    }

    fn at_path(&self, path: &[usize]) -> Option<&DataType> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.data_types.get(*first)?, |data_type, index| {
                data_type.sub_data_types.get(*index)
            })
    }

    fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut DataType> {
        let (first, rest) = path.split_first()?;
        let mut data_type = self.data_types.get_mut(*first)?;
        for index in rest {
            data_type = data_type.sub_data_types.get_mut(*index)?;
        }
        Some(data_type)
    }

    fn siblings_mut(&mut self, parent_path: &[usize]) -> Option<&mut Vec<DataType>> {
        if parent_path.is_empty() {
            return Some(&mut self.data_types);
        }
        self.at_path_mut(parent_path)
            .map(|parent| &mut parent.sub_data_types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> DataType {
        DataType::new(name, Some("string".to_string())).with_uuid(name)
    }

    /// `tPerson { name, address { street } }`, `tCity`
    fn sample_tree() -> DataTypeTree {
        DataTypeTree::new(vec![
            named("tPerson").with_sub_data_types(vec![
                named("name"),
                named("address").with_sub_data_types(vec![named("street")]),
            ]),
            named("tCity"),
        ])
    }

    fn names(tree: &DataTypeTree) -> Vec<(String, usize)> {
        tree.flatten()
            .into_iter()
            .map(|(data_type, level)| (data_type.name().to_string(), level))
            .collect()
    }

    #[test]
    fn test_flatten_is_depth_first() {
        let tree = sample_tree();

        assert_eq!(
            names(&tree),
            vec![
                ("tPerson".to_string(), 0),
                ("name".to_string(), 1),
                ("address".to_string(), 1),
                ("street".to_string(), 2),
                ("tCity".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_calculate_hash_and_find_by_hash() {
        let tree = sample_tree();

        assert_eq!(
            tree.calculate_hash("street").as_deref(),
            Some("tPerson.address.street")
        );
        assert_eq!(
            tree.find_by_hash("tPerson.address").map(DataType::uuid),
            Some("address")
        );
        assert!(tree.find_by_hash("tCity.street").is_none());
    }

    #[test]
    fn test_parent_uuid() {
        let tree = sample_tree();

        assert_eq!(tree.parent_uuid("street"), Some("address"));
        assert_eq!(tree.parent_uuid("tCity"), None);
    }

    #[test]
    fn test_remove_takes_nested_types_along() {
        let mut tree = sample_tree();

        let removed = tree.remove("address").expect("removed");

        assert_eq!(removed.sub_data_types().len(), 1);
        assert!(tree.find("street").is_none());
        assert!(tree.remove("address").is_none());
    }

    #[test]
    fn test_insertions() {
        let mut tree = sample_tree();

        tree.insert_nested("tCity", named("zip")).expect("nested");
        tree.insert_below("name", named("age")).expect("below");
        tree.insert_top_level_below("street", named("tCountry"))
            .expect("top level");
        tree.insert_at_the_top(named("tAny"));

        let top: Vec<&str> = tree.data_types().iter().map(DataType::name).collect();
        assert_eq!(top, vec!["tAny", "tPerson", "tCountry", "tCity"]);
        assert_eq!(tree.calculate_hash("age").as_deref(), Some("tPerson.age"));
        assert_eq!(tree.parent_uuid("zip"), Some("tCity"));
    }

    #[test]
    fn test_read_only_parent_rejects_insertions() {
        let mut tree = DataTypeTree::new(vec![named("tImported").with_read_only(true)]);

        let result = tree.insert_nested("tImported", named("field"));

        assert!(matches!(result, Err(DndError::ReadOnly(_))));
    }

    #[test]
    fn test_item_definition_conversion() {
        let definition = ItemDefinition {
            id: Some("_1".to_string()),
            name: "tPerson".to_string(),
            is_collection: true,
            read_only: true,
            item_components: vec![ItemDefinition {
                name: "name".to_string(),
                type_ref: Some("string".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let tree = DataTypeTree::from_item_definitions(std::slice::from_ref(&definition));

        let data_type = &tree.data_types()[0];
        assert!(data_type.is_list());
        assert!(data_type.sub_data_types()[0].is_read_only());

        let mut expected = definition;
        expected.item_components[0].read_only = true;
        assert_eq!(tree.to_item_definitions(), vec![expected]);
    }
}
