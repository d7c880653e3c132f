use serde::{Deserialize, Serialize};

/// One of the fixed business concepts an uploaded file is mapped onto.
///
/// The four required fields gate the wizard's confirm action and the store's
/// `update_column_mapping`; `Product` and `Channel` may stay unmapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    Date,
    Amount,
    OrderId,
    CustomerId,
    Product,
    Channel,
}

impl CanonicalField {
    /// All fields in the order the wizard presents them.
    pub fn all() -> &'static [Self] {
        &[
            Self::Date,
            Self::Amount,
            Self::OrderId,
            Self::CustomerId,
            Self::Product,
            Self::Channel,
        ]
    }

    pub fn required() -> &'static [Self] {
        &[Self::Date, Self::Amount, Self::OrderId, Self::CustomerId]
    }

    pub fn is_required(&self) -> bool {
        Self::required().contains(self)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Amount => "Amount",
            Self::OrderId => "Order ID",
            Self::CustomerId => "Customer ID",
            Self::Product => "Product",
            Self::Channel => "Channel",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Date => "Transaction or event date",
            Self::Amount => "Revenue or transaction amount",
            Self::OrderId => "Unique order identifier",
            Self::CustomerId => "Unique customer identifier",
            Self::Product => "Product name or ID",
            Self::Channel => "Sales or marketing channel",
        }
    }

    /// Lower-case fragments that mark a source column as a likely match.
    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Date => &["date", "order_date", "timestamp"],
            Self::Amount => &["amount", "revenue", "sales", "price", "total"],
            Self::OrderId => &["order_id", "order", "invoice", "transaction"],
            Self::CustomerId => &["customer", "cust_id", "client"],
            Self::Product => &["product", "sku", "item"],
            Self::Channel => &["channel", "source", "platform"],
        }
    }
}

/// User-declared correspondence between canonical fields and source columns.
///
/// Every field holds the name of a source column; an empty string means the
/// field is unmapped. A mapping is attached to exactly one `DataFile`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnMapping {
    pub date: String,
    pub amount: String,
    pub order_id: String,
    pub customer_id: String,
    pub product: String,
    pub channel: String,
}

impl ColumnMapping {
    pub fn get(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::Date => &self.date,
            CanonicalField::Amount => &self.amount,
            CanonicalField::OrderId => &self.order_id,
            CanonicalField::CustomerId => &self.customer_id,
            CanonicalField::Product => &self.product,
            CanonicalField::Channel => &self.channel,
        }
    }

    pub fn set(&mut self, field: CanonicalField, column: impl Into<String>) {
        let slot = match field {
            CanonicalField::Date => &mut self.date,
            CanonicalField::Amount => &mut self.amount,
            CanonicalField::OrderId => &mut self.order_id,
            CanonicalField::CustomerId => &mut self.customer_id,
            CanonicalField::Product => &mut self.product,
            CanonicalField::Channel => &mut self.channel,
        };
        *slot = column.into();
    }

    pub fn is_mapped(&self, field: CanonicalField) -> bool {
        !self.get(field).trim().is_empty()
    }

    /// Required fields that are still empty, in presentation order.
    pub fn missing_required(&self) -> Vec<CanonicalField> {
        CanonicalField::required()
            .iter()
            .copied()
            .filter(|field| !self.is_mapped(*field))
            .collect()
    }

    /// A mapping is complete iff date, amount, orderId and customerId are all
    /// non-empty. Optional fields never affect the result.
    pub fn is_complete(&self) -> bool {
        CanonicalField::required()
            .iter()
            .all(|field| self.is_mapped(*field))
    }
}

/// Guesses a mapping from column names.
///
/// Matching is case-insensitive substring search over each field's keywords;
/// the first column that matches wins and a column is handed to at most one
/// field. Fields without a match stay empty.
///
/// Claiming columns exclusively, and the plain `"order"` keyword for order
/// ids, are deliberate: `order_date` goes to the date field, and a bare
/// `Order` column is still offered as the order id.
pub fn suggest_mapping(columns: &[String]) -> ColumnMapping {
    let lowered: Vec<String> = columns.iter().map(|c| c.to_lowercase()).collect();
    let mut taken = vec![false; columns.len()];
    let mut mapping = ColumnMapping::default();

    for field in CanonicalField::all() {
        let found = lowered.iter().enumerate().find(|(idx, name)| {
            !taken[*idx] && field.keywords().iter().any(|k| name.contains(k))
        });
        if let Some((idx, _)) = found {
            taken[idx] = true;
            mapping.set(*field, columns[idx].clone());
        }
    }

    mapping
}
