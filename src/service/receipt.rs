use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{format_money, PrintedBill};

/// 小票文件名：receipt-YYYYmmdd-HHMMSS.csv
pub fn receipt_file_name(printed_at: DateTime<Local>) -> String {
    format!("receipt-{}.csv", printed_at.format("%Y%m%d-%H%M%S"))
}

/// 导出小票到 CSV 文件
pub fn export_receipt_csv(bill: &PrintedBill, output_path: &Path) -> Result<()> {
    use csv::Writer;

    let mut writer = Writer::from_path(output_path)?;
    writer.write_record(["line_no", "name", "quantity", "unit_price", "subtotal"])?;

    for (idx, line) in bill.items.iter().enumerate() {
        writer.write_record(&[
            (idx + 1).to_string(),
            line.name.clone(),
            line.quantity.to_string(),
            format_money(&line.unit_price),
            format_money(&line.subtotal),
        ])?;
    }

    writer.write_record(&[
        String::new(),
        "TOTAL".to_string(),
        String::new(),
        String::new(),
        format_money(&bill.total),
    ])?;

    writer.flush()?;
    Ok(())
}

/// 写入导出目录，返回文件路径
pub fn export_to_dir(bill: &PrintedBill, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(receipt_file_name(Local::now()));
    export_receipt_csv(bill, &path)?;
    tracing::info!("Receipt exported to {}", path.display());
    Ok(path)
}
