use crate::{error::CompileError, schema::DataType};
use std::{fmt, sync::Arc};

/// Renders access to a value given the subject expression.
pub type AccessorFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Compiles the nested predicate against the inner subject chosen by a relationship.
pub type NestedPredicate<'a> = dyn Fn(&str) -> Result<String, CompileError> + 'a;

/// Renders a "related entities match" expression around a nested predicate.
pub type MatchesFn =
    Arc<dyn Fn(&str, &NestedPredicate<'_>) -> Result<String, CompileError> + Send + Sync>;

/// Renders a "relationship is non-empty" expression.
pub type ExistsFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

fn member_accessor(member: &str) -> AccessorFn {
    let member = member.to_string();
    Arc::new(move |subject| format!("{subject}.{member}"))
}

///
/// PropertyDescriptor
///

#[derive(Clone)]
pub struct PropertyDescriptor {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub data_type: DataType,
    pub enum_values: Option<Vec<String>>,
    pub open_enum: bool,
    pub unordered_enum: bool,
    accessor: AccessorFn,
}

impl PropertyDescriptor {
    pub fn new(
        id: impl Into<String>,
        data_type: DataType,
        accessor: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        let id = id.into();

        Self {
            display_name: id.clone(),
            description: String::new(),
            id,
            data_type,
            enum_values: None,
            open_enum: false,
            unordered_enum: false,
            accessor: Arc::new(accessor),
        }
    }

    /// Property read as `<subject>.<id>`.
    ///
    /// Boolean members enumerate `true`/`false` so authoring surfaces can
    /// offer a closed choice.
    pub fn member(id: impl Into<String>, data_type: DataType) -> Self {
        let id = id.into();
        let accessor = member_accessor(&id);
        let enum_values = (data_type == DataType::Boolean)
            .then(|| vec!["true".to_string(), "false".to_string()]);

        Self {
            display_name: id.clone(),
            description: String::new(),
            id,
            data_type,
            enum_values,
            open_enum: false,
            unordered_enum: false,
            accessor,
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub const fn with_open_enum(mut self, open_enum: bool) -> Self {
        self.open_enum = open_enum;
        self
    }

    #[must_use]
    pub const fn with_unordered_enum(mut self, unordered_enum: bool) -> Self {
        self.unordered_enum = unordered_enum;
        self
    }

    /// Render access to this property on `subject`.
    #[must_use]
    pub fn access(&self, subject: &str) -> String {
        (self.accessor)(subject)
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("data_type", &self.data_type)
            .field("enum_values", &self.enum_values)
            .finish_non_exhaustive()
    }
}

///
/// RelationshipDescriptor
///
/// Traversal from one object type to related objects of `target_type`.
/// The descriptor picks the inner subject handed to the nested predicate.
///

#[derive(Clone)]
pub struct RelationshipDescriptor {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub target_type: String,
    matches: MatchesFn,
    exists: ExistsFn,
}

impl RelationshipDescriptor {
    pub fn new(
        id: impl Into<String>,
        target_type: impl Into<String>,
        matches: impl Fn(&str, &NestedPredicate<'_>) -> Result<String, CompileError>
        + Send
        + Sync
        + 'static,
        exists: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        let id = id.into();

        Self {
            display_name: id.clone(),
            description: String::new(),
            id,
            target_type: target_type.into(),
            matches: Arc::new(matches),
            exists: Arc::new(exists),
        }
    }

    /// To-many relationship: any related entity (bound as `s`) satisfies the
    /// nested predicate; exists when the collection is non-empty.
    pub fn collection(id: impl Into<String>, target_type: impl Into<String>) -> Self {
        let id = id.into();
        let member = id.clone();
        let exists_member = id.clone();

        Self::new(
            id,
            target_type,
            move |subject, nested| {
                Ok(format!("{subject}.{member}.any((s) => {})", nested("s")?))
            },
            move |subject| format!("!{subject}.{exists_member}.empty()"),
        )
    }

    /// To-one relationship: the related entity is present and satisfies the
    /// nested predicate, which reads it through the member path directly.
    pub fn singular(id: impl Into<String>, target_type: impl Into<String>) -> Self {
        let id = id.into();
        let member = id.clone();
        let exists_member = id.clone();

        Self::new(
            id,
            target_type,
            move |subject, nested| {
                let related = format!("{subject}.{member}");
                Ok(format!("(!!{related} && {})", nested(related.as_str())?))
            },
            move |subject| format!("!!({subject}.{exists_member})"),
        )
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Render the match expression, compiling the nested predicate through `nested`.
    pub fn render_matches(
        &self,
        subject: &str,
        nested: &NestedPredicate<'_>,
    ) -> Result<String, CompileError> {
        (self.matches)(subject, nested)
    }

    #[must_use]
    pub fn render_exists(&self, subject: &str) -> String {
        (self.exists)(subject)
    }
}

impl fmt::Debug for RelationshipDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationshipDescriptor")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("target_type", &self.target_type)
            .finish_non_exhaustive()
    }
}

///
/// Naming
///
/// Display-name capability of an object type.
///

#[derive(Clone)]
pub struct Naming {
    getter: AccessorFn,
}

impl Naming {
    pub fn new(getter: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            getter: Arc::new(getter),
        }
    }

    /// Name read as `<subject>.<member>`.
    #[must_use]
    pub fn member(member: &str) -> Self {
        Self {
            getter: member_accessor(member),
        }
    }

    #[must_use]
    pub fn access(&self, subject: &str) -> String {
        (self.getter)(subject)
    }
}

impl fmt::Debug for Naming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Naming").finish_non_exhaustive()
    }
}
