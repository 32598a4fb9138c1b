use super::schema::{FieldSpec, FieldType};
use super::EntityModel;
use chrono::Local;
use serde_json::Value as JsonValue;

pub const CATEGORIAS: &[&str] = &[
    "Entrada",
    "Principal",
    "Sobremesa",
    "Bebida",
    "Acompanhamento",
    "Outro",
];
pub const STATUS_PEDIDO: &[&str] = &["Em aberto", "Fechado"];
pub const FORMAS_PAGAMENTO: &[&str] = &["Pix", "Cartão", "Dinheiro"];

const CARDAPIO_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("nome", FieldType::Text),
    FieldSpec::required("descricao", FieldType::Text),
    FieldSpec::required("preco", FieldType::Float),
    FieldSpec::required("categoria", FieldType::Enum(CATEGORIAS)),
    FieldSpec::required("disponivel", FieldType::Bool),
];

const CLIENTE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("nome", FieldType::Text),
    FieldSpec::required("email", FieldType::Text),
    FieldSpec::required("telefone", FieldType::Text),
    FieldSpec::required("data_nascimento", FieldType::Date),
    FieldSpec::required("cpf", FieldType::Text),
];

const PEDIDO_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("cliente_id", FieldType::Int).references("cliente"),
    FieldSpec::required("itens", FieldType::IntList).references("cardapio"),
    FieldSpec::required("data_hora_pedido", FieldType::DateTime),
    FieldSpec::required("status", FieldType::Enum(STATUS_PEDIDO)),
    FieldSpec::optional("forma_pagamento", FieldType::Enum(FORMAS_PAGAMENTO)),
];

/// Menu items (`cardapio.csv`).
pub struct CardapioModel;

impl EntityModel for CardapioModel {
    fn table_name(&self) -> &str {
        "cardapio"
    }

    fn label(&self) -> &str {
        "Menu item"
    }

    fn fields(&self) -> &[FieldSpec] {
        CARDAPIO_FIELDS
    }
}

/// Customers (`cliente.csv`).
pub struct ClienteModel;

impl EntityModel for ClienteModel {
    fn table_name(&self) -> &str {
        "cliente"
    }

    fn label(&self) -> &str {
        "Customer"
    }

    fn fields(&self) -> &[FieldSpec] {
        CLIENTE_FIELDS
    }
}

/// Orders (`pedido.csv`). `cliente_id` and `itens` must point at existing rows.
pub struct PedidoModel;

impl EntityModel for PedidoModel {
    fn table_name(&self) -> &str {
        "pedido"
    }

    fn label(&self) -> &str {
        "Order"
    }

    fn fields(&self) -> &[FieldSpec] {
        PEDIDO_FIELDS
    }

    fn default_value(&self, field: &str) -> Option<JsonValue> {
        match field {
            "data_hora_pedido" => Some(JsonValue::from(
                Local::now()
                    .naive_local()
                    .format("%Y-%m-%dT%H:%M:%S%.6f")
                    .to_string(),
            )),
            _ => None,
        }
    }
}
