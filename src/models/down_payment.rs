use super::text_enum;

text_enum!(PaymentStatus, "payment status", {
    Pending => "pending",
    Paid => "paid",
    Cancelled => "cancelled",
});

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct DownPayment {
    pub id: i32,
    pub contract_id: i32,
    pub amount: f64,
    pub payment_date: chrono::NaiveDate,
    #[sqlx(try_from = "String")]
    pub status: PaymentStatus,
    pub notes: Option<String>,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct DownPaymentDetails {
    #[sqlx(flatten)]
    pub payment: DownPayment,
    pub contract_number: String,
    pub customer_name: String,
    pub contract_amount: f64,
}
