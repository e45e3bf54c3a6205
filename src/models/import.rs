// src/models/import.rs

use serde::Serialize;
use utoipa::ToSchema;

/// How a stored column is coerced from a spreadsheet cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Real,
    Timestamp,
}

/// Localized spreadsheet header → canonical column.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    pub header: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
}

const fn text(header: &'static str, column: &'static str) -> FieldMapping {
    FieldMapping { header, column, kind: FieldKind::Text }
}

const fn real(header: &'static str, column: &'static str) -> FieldMapping {
    FieldMapping { header, column, kind: FieldKind::Real }
}

const fn timestamp(header: &'static str, column: &'static str) -> FieldMapping {
    FieldMapping { header, column, kind: FieldKind::Timestamp }
}

/// Expected layout of one export type and the table it is upserted into.
#[derive(Debug, Clone, Copy)]
pub struct SheetSchema {
    pub entity: &'static str,
    pub table: &'static str,
    /// Primary-key column, always `id`.
    pub key_column: &'static str,
    pub fields: &'static [FieldMapping],
}

impl SheetSchema {
    pub fn key_field(&self) -> Option<&FieldMapping> {
        self.fields.iter().find(|f| f.column == self.key_column)
    }

    pub fn field_by_header(&self, header: &str) -> Option<&FieldMapping> {
        self.fields.iter().find(|f| f.header == header)
    }
}

pub const ORDER_SHEET: SheetSchema = SheetSchema {
    entity: "orders",
    table: "orders",
    key_column: "id",
    fields: &[
        text("Идентификатор", "id"),
        text("Номер", "number"),
        text("Имя контакта", "contact_name"),
        text("Фамилия контакта", "contact_surname"),
        text("Email контакта", "contact_email"),
        text("Ответственный", "responsible_person"),
        text("Содержимое", "content"),
        text("Статус", "status"),
        real("Общая сумма", "total_amount"),
        real("Оплаченная сумма", "paid_amount"),
        timestamp("Дата создания", "creation_date"),
        timestamp("Дата оплаты", "payment_date"),
        text("Валюта", "currency"),
        text("Теги", "tags"),
        real("Сумма скидки", "discount_amount"),
        real("Доход", "income"),
        real("Комиссия", "commission"),
        text("Идентификатор партнера", "partner_id"),
        text("Email партнера", "partner_email"),
        real("Комиссия партнера", "partner_commission"),
        text("Телефон контакта", "contact_phone"),
        text("Идентификатор контакта", "contact_id"),
        text("UTM Campaign", "utm_campaign"),
        text("UTM Content", "utm_content"),
        text("UTM Medium", "utm_medium"),
        text("UTM Source", "utm_source"),
        text("UTM Term", "utm_term"),
        timestamp("Дата заказа в ГК", "gc_order_date"),
    ],
};

pub const CONTACT_SHEET: SheetSchema = SheetSchema {
    entity: "contacts",
    table: "contacts",
    key_column: "id",
    fields: &[
        text("Идентификатор", "id"),
        text("Полное имя", "full_name"),
        text("Имя", "first_name"),
        text("Отчество", "middle_name"),
        text("Фамилия", "last_name"),
        text("Email", "email"),
        text("Email адреса", "emails"),
        text("Телефон", "phone"),
        text("Телефоны", "phones"),
        text("Страна", "country"),
        text("Город", "city"),
        text("Регион", "region"),
        text("Теги", "tags"),
        text("Группы", "groups"),
        timestamp("Дата создания", "creation_date"),
        timestamp("День рождения", "birthday"),
        timestamp("Последний раз онлайн", "last_online"),
        timestamp("Последняя активность", "last_activity"),
        real("Сумма оплат", "total_paid"),
        real("Геймификация. Баллы", "gamification_score"),
        real("Баланс бонусов", "bonus_balance"),
        text("Партнер ID", "partner_id"),
        text("Первая utm_source метка", "first_utm_source"),
        text("Последняя utm_source метка", "last_utm_source"),
        text("tg_id", "tg_id"),
    ],
};

/// Header reconciliation policy for uploaded sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderPolicy {
    /// Observed headers must equal the dictionary exactly.
    #[default]
    Strict,
    /// Known headers are renamed, unknown ones ignored, absent ones stored as NULL.
    Lenient,
}

impl std::str::FromStr for HeaderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(HeaderPolicy::Strict),
            "lenient" => Ok(HeaderPolicy::Lenient),
            other => Err(format!("unknown header policy '{other}', expected strict or lenient")),
        }
    }
}

/// A coerced cell ready to be bound into SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Missing,
    Text(String),
    Real(f64),
    Timestamp(chrono::NaiveDateTime),
}

/// One spreadsheet row mapped onto schema columns, in `SheetSchema::fields` order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRecord {
    pub key: String,
    pub values: Vec<FieldValue>,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct ImportSummary {
    #[schema(example = "success")]
    pub status: String,
    pub created: u64,
    pub updated: u64,
    pub skipped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn dictionaries_have_unique_headers_and_columns() {
        for schema in [ORDER_SHEET, CONTACT_SHEET] {
            let headers: HashSet<_> = schema.fields.iter().map(|f| f.header).collect();
            let columns: HashSet<_> = schema.fields.iter().map(|f| f.column).collect();
            assert_eq!(headers.len(), schema.fields.len(), "{}", schema.entity);
            assert_eq!(columns.len(), schema.fields.len(), "{}", schema.entity);
            assert_eq!(schema.key_field().map(|f| f.header), Some("Идентификатор"));
        }
        assert_eq!(ORDER_SHEET.fields.len(), 28);
        assert_eq!(CONTACT_SHEET.fields.len(), 25);
    }

    #[test]
    fn header_policy_parses_case_insensitively() {
        assert_eq!("Strict".parse::<HeaderPolicy>(), Ok(HeaderPolicy::Strict));
        assert_eq!(" lenient ".parse::<HeaderPolicy>(), Ok(HeaderPolicy::Lenient));
        assert!("loose".parse::<HeaderPolicy>().is_err());
    }
}
