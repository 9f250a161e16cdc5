#![allow(missing_docs, dead_code)]

pub const ORDER: &str = r#"
{
    "orderId": 1042,
    "customer": {
        "DISPLAY_NAME": "Ada Lovelace",
        "email": "ada@example.com"
    },
    "status": "SHIPPED",
    "total": 123456789012345678901234567890.125,
    "lines": [
        { "sku": "A-1", "quantity": 2, "unit_price": 9.99 },
        null,
        { "sku": "B-7", "quantity": 1, "unit_price": 120 }
    ],
    "notes": null,
    "gift": false,
    "TRACKING-CODE": "1Z999"
}
"#;

jsonbind::json_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Status { PENDING, SHIPPED, DELIVERED }
}

jsonbind::json_record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Customer {
        pub display_name: String,
        pub email: Option<String>,
    }
}

jsonbind::json_record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Line {
        pub sku: String,
        pub quantity: u32,
        pub unit_price: f64,
    }
}

jsonbind::json_record! {
    #[derive(Debug, Clone, PartialEq)]
    #[allow(non_snake_case)]
    pub struct Order {
        pub orderId: i64,
        pub customer: Customer,
        pub status: Status,
        pub total: bigdecimal::BigDecimal,
        pub lines: Vec<Option<Line>>,
        pub notes: Option<String>,
        pub gift: bool,
        pub trackingCode: Option<String>,
    }
}
