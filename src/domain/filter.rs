//! Record filters and list pagination.

use crate::domain::model::schema::FieldType;
use crate::domain::model::{EntityModel, Record};
use crate::error::{Result, StoreError};
use crate::storage::codec::render_cell;
use serde_json::Value as JsonValue;

/// Query parameters reserved for pagination, never treated as field filters.
pub const PAGE_PARAM: &str = "page";
pub const LIMIT_PARAM: &str = "limit";
pub const MAX_LIMIT: usize = 100;

/// Field conditions combined with AND.
///
/// Empty values and fields outside the schema impose no constraint. Identifier fields
/// match exactly (list fields by membership); every other field matches when its cell
/// text contains the value, ignoring case.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<(String, String)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    /// Builds a filter from query pairs, skipping the pagination parameters.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let conditions = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k != PAGE_PARAM && k != LIMIT_PARAM)
            .collect();
        Self { conditions }
    }

    pub fn matches(&self, model: &dyn EntityModel, record: &Record) -> bool {
        self.conditions.iter().all(|(field, wanted)| {
            let wanted = wanted.trim();
            if wanted.is_empty() {
                return true;
            }
            let Some(spec) = model.field(field) else {
                return true;
            };
            let value = record.get(field.as_str()).unwrap_or(&JsonValue::Null);

            match (spec.is_identifier(), spec.field_type) {
                (true, FieldType::IntList) => match wanted.parse::<i64>() {
                    Ok(id) => value
                        .as_array()
                        .map(|items| items.iter().any(|item| item.as_i64() == Some(id)))
                        .unwrap_or(false),
                    Err(_) => false,
                },
                (true, field_type) => render_cell(field_type, value) == wanted,
                (false, field_type) => render_cell(field_type, value)
                    .to_lowercase()
                    .contains(&wanted.to_lowercase()),
            }
        })
    }
}

/// `page` is 1-based. Without a limit every record is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub limit: Option<usize>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: None,
        }
    }
}

impl Pagination {
    pub fn new(page: usize, limit: usize) -> Result<Self> {
        if page < 1 {
            return Err(StoreError::validation("page must be at least 1"));
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(StoreError::validation(format!(
                "limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }
        Ok(Self {
            page,
            limit: Some(limit),
        })
    }

    /// Parses the raw `page` / `limit` query values.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Result<Self> {
        let parse = |name: &str, raw: &str| {
            raw.trim().parse::<usize>().map_err(|_| {
                StoreError::validation(format!("{} must be a positive integer", name))
            })
        };
        let page = match page {
            Some(raw) => parse(PAGE_PARAM, raw)?,
            None => 1,
        };
        match limit {
            Some(raw) => Self::new(page, parse(LIMIT_PARAM, raw)?),
            None if page == 1 => Ok(Self::default()),
            None => Err(StoreError::validation("page requires a limit")),
        }
    }

    /// A page that starts past `usize::MAX` is empty.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let Some(limit) = self.limit else {
            return items;
        };
        match (self.page - 1).checked_mul(limit) {
            Some(skip) => items.into_iter().skip(skip).take(limit).collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CardapioModel, PedidoModel};
    use serde_json::json;

    fn record(value: JsonValue) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn suco() -> Record {
        record(json!({
            "id": 0, "nome": "Suco", "descricao": "Suco de laranja",
            "preco": 8.5, "categoria": "Bebida", "disponivel": true
        }))
    }

    #[test]
    fn substring_match_ignores_case() {
        let f = Filter::new().with("descricao", "LARANJA");
        assert!(f.matches(&CardapioModel, &suco()));
        assert!(!Filter::new().with("nome", "bolo").matches(&CardapioModel, &suco()));
    }

    #[test]
    fn conditions_are_combined_with_and() {
        let both = Filter::new().with("nome", "u").with("categoria", "Bebida");
        let one_fails = Filter::new().with("nome", "u").with("categoria", "Entrada");
        assert!(both.matches(&CardapioModel, &suco()));
        assert!(!one_fails.matches(&CardapioModel, &suco()));
    }

    #[test]
    fn empty_values_and_unknown_fields_are_ignored() {
        let f = Filter::new().with("nome", "").with("sabor", "uva");
        assert!(f.matches(&CardapioModel, &suco()));
    }

    #[test]
    fn bools_and_floats_match_their_cell_text() {
        assert!(Filter::new().with("disponivel", "true").matches(&CardapioModel, &suco()));
        assert!(Filter::new().with("preco", "8.5").matches(&CardapioModel, &suco()));
    }

    #[test]
    fn identifiers_match_exactly() {
        let pedido = record(json!({
            "id": 12, "cliente_id": 1, "itens": [10, 11],
            "data_hora_pedido": "2024-03-01T12:00:00", "status": "Em aberto",
            "forma_pagamento": null
        }));
        assert!(Filter::new().with("cliente_id", "1").matches(&PedidoModel, &pedido));
        assert!(!Filter::new().with("id", "1").matches(&PedidoModel, &pedido));
        assert!(Filter::new().with("itens", "11").matches(&PedidoModel, &pedido));
        assert!(!Filter::new().with("itens", "1").matches(&PedidoModel, &pedido));
        assert!(!Filter::new().with("forma_pagamento", "Pix").matches(&PedidoModel, &pedido));
    }

    #[test]
    fn pagination_slices_after_filtering() {
        let items: Vec<u32> = (0..25).collect();
        let page = Pagination::from_query(Some("3"), Some("10")).unwrap();
        assert_eq!(page.apply(items.clone()), (20..25).collect::<Vec<_>>());
        assert_eq!(Pagination::default().apply(items.clone()).len(), 25);
        assert!(Pagination::from_query(Some("0"), Some("10")).is_err());
        assert!(Pagination::from_query(None, Some("101")).is_err());
        assert!(Pagination::from_query(Some("2"), None).is_err());
    }

    #[test]
    fn page_far_past_the_end_is_empty() {
        let items: Vec<u32> = (0..5).collect();
        let huge = Pagination::from_query(Some(&usize::MAX.to_string()), Some("100")).unwrap();
        assert!(huge.apply(items.clone()).is_empty());
        let past = Pagination::new(3, 5).unwrap();
        assert!(past.apply(items).is_empty());
    }

    #[test]
    fn pagination_params_are_not_filters() {
        let f = Filter::from_pairs(vec![("page", "2"), ("limit", "5"), ("nome", "suco")]);
        assert!(f.matches(&CardapioModel, &suco()));
    }
}
