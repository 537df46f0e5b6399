//! WHERE-clause methods shared by the SELECT, UPDATE and DELETE builders.

/// Implements the condition methods on a builder with a `Vec<Condition>` field.
macro_rules! impl_filter_methods {
    ($builder:ty, $field:ident) => {
        impl $builder {
            /// Add a condition (AND-combined with the others).
            pub fn filter(mut self, condition: impl Into<$crate::condition::Condition>) -> Self {
                self.$field.push(condition.into());
                self
            }

            /// Add several conditions.
            pub fn filters<C: Into<$crate::condition::Condition>>(
                mut self,
                conditions: impl IntoIterator<Item = C>,
            ) -> Self {
                self.$field.extend(conditions.into_iter().map(Into::into));
                self
            }

            /// Add an OR-group: `(a OR b OR ...)`.
            pub fn any_of(
                self,
                predicates: impl IntoIterator<Item = $crate::condition::Predicate>,
            ) -> Self {
                self.filter($crate::condition::Condition::any_of(predicates))
            }

            /// Add trusted raw SQL.
            pub fn raw(self, sql: impl Into<String>) -> Self {
                self.filter($crate::condition::Predicate::raw(sql))
            }

            /// column = value
            pub fn is(self, column: &str, value: impl Into<$crate::value::Value>) -> Self {
                self.filter($crate::condition::Predicate::is(column, value))
            }

            /// column != value
            pub fn not_is(self, column: &str, value: impl Into<$crate::value::Value>) -> Self {
                self.filter($crate::condition::Predicate::not_is(column, value))
            }

            /// column LIKE '%text%'
            pub fn like(self, column: &str, text: impl Into<String>) -> Self {
                self.filter($crate::condition::Predicate::like(column, text))
            }

            /// column NOT LIKE '%text%'
            pub fn not_like(self, column: &str, text: impl Into<String>) -> Self {
                self.filter($crate::condition::Predicate::not_like(column, text))
            }

            /// column LIKE 'text%'
            pub fn start_with(self, column: &str, text: impl Into<String>) -> Self {
                self.filter($crate::condition::Predicate::start_with(column, text))
            }

            /// column LIKE '%text'
            pub fn end_with(self, column: &str, text: impl Into<String>) -> Self {
                self.filter($crate::condition::Predicate::end_with(column, text))
            }

            /// column IN (values...)
            pub fn in_list<V: Into<$crate::value::Value>>(
                self,
                column: &str,
                values: impl IntoIterator<Item = V>,
            ) -> Self {
                self.filter($crate::condition::Predicate::in_list(column, values))
            }

            /// column NOT IN (values...)
            pub fn not_in<V: Into<$crate::value::Value>>(
                self,
                column: &str,
                values: impl IntoIterator<Item = V>,
            ) -> Self {
                self.filter($crate::condition::Predicate::not_in(column, values))
            }

            /// column BETWEEN from AND to
            pub fn between(
                self,
                column: &str,
                from: impl Into<$crate::value::Value>,
                to: impl Into<$crate::value::Value>,
            ) -> Self {
                self.filter($crate::condition::Predicate::between(column, from, to))
            }

            /// column NOT BETWEEN from AND to
            pub fn not_between(
                self,
                column: &str,
                from: impl Into<$crate::value::Value>,
                to: impl Into<$crate::value::Value>,
            ) -> Self {
                self.filter($crate::condition::Predicate::not_between(column, from, to))
            }

            /// column IS NULL
            pub fn is_null(self, column: &str) -> Self {
                self.filter($crate::condition::Predicate::is_null(column))
            }

            /// column IS NOT NULL
            pub fn not_null(self, column: &str) -> Self {
                self.filter($crate::condition::Predicate::not_null(column))
            }

            /// column = ''
            pub fn is_empty(self, column: &str) -> Self {
                self.filter($crate::condition::Predicate::is_empty(column))
            }

            /// column != ''
            pub fn not_empty(self, column: &str) -> Self {
                self.filter($crate::condition::Predicate::not_empty(column))
            }

            /// FIND_IN_SET(value, column)
            pub fn find_in_set(self, column: &str, value: impl Into<$crate::value::Value>) -> Self {
                self.filter($crate::condition::Predicate::find_in_set(column, value))
            }
        }
    };
}

pub(crate) use impl_filter_methods;
