use marginmap_core::Transaction;
use std::path::Path;

/// Read transaction rows from a headed CSV file. Expected columns match the
/// JSON field names (date, customer_name, sku_code, sku_name, category,
/// qty_sold, unit_cost, unit_price, ...); optional columns may be omitted.
pub fn read_transactions(path: &str) -> Result<Vec<Transaction>, Box<dyn std::error::Error>> {
    if !Path::new(path).is_file() {
        return Err(format!("File not found: {}", path).into());
    }

    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| format!("Failed to open '{}': {}", path, e))?;

    let mut transactions = Vec::new();
    for (row, record) in reader.deserialize::<Transaction>().enumerate() {
        let mut transaction =
            record.map_err(|e| format!("Row {} of '{}': {}", row + 1, path, e))?;
        if transaction.id == 0 {
            transaction.id = (row + 1) as u64;
        }
        transactions.push(transaction);
    }

    Ok(transactions)
}
