//! Tabular projections of API records, shared by the CLI printer and the console.

use docgen_client::models::{
    Activity, Customer, DashboardStats, DocumentTemplate, GeneratedDocument, Order, Page, Product, User,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    /// e.g. "page 1/3, 42 total"
    pub footer: Option<String>,
}

impl Table {
    fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            ..Self::default()
        }
    }

    fn with_page<T>(mut self, page: &Page<T>) -> Self {
        let p = &page.pagination;
        self.footer = Some(format!("page {}/{}, {} total", p.page, p.pages.max(1), p.total));
        self
    }

    /// Column widths fitting header and content.
    pub fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Plain-text rendering for the CLI.
    pub fn render(&self) -> String {
        let widths = self.widths();
        let line = |cells: Vec<&str>| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = vec![line(self.headers.clone())];
        for row in &self.rows {
            out.push(line(row.iter().map(String::as_str).collect()));
        }
        if self.rows.is_empty() {
            out.push("(no results)".to_string());
        }
        if let Some(footer) = &self.footer {
            out.push(footer.clone());
        }
        out.join("\n")
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().filter(|v| !v.is_empty()).unwrap_or_else(|| "-".to_string())
}

pub fn money(value: Option<f64>) -> String {
    value.map(|v| format!("€ {:.2}", v)).unwrap_or_else(|| "-".to_string())
}

pub fn customers(page: &Page<Customer>) -> Table {
    let mut table = Table::new(&["ID", "NUMBER", "COMPANY", "CONTACT", "EMAIL", "PHONE"]).with_page(page);
    table.rows = page
        .items
        .iter()
        .map(|c| {
            vec![
                c.id.clone(),
                text(&c.customer_number),
                c.company_name.clone(),
                text(&c.contact_person),
                text(&c.email),
                text(&c.phone),
            ]
        })
        .collect();
    table
}

pub fn products(page: &Page<Product>) -> Table {
    let mut table = Table::new(&["ID", "ARTICLE", "NAME", "UNIT", "PRICE EXCL", "CATEGORY"]).with_page(page);
    table.rows = page
        .items
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                text(&p.article_number),
                p.name.clone(),
                text(&p.unit),
                money(p.price_excl_btw),
                text(&p.category_name),
            ]
        })
        .collect();
    table
}

fn order_rows(orders: &[Order]) -> Vec<Vec<String>> {
    orders
        .iter()
        .map(|o| {
            vec![
                o.id.clone(),
                o.order_number.clone(),
                text(&o.customer_name),
                o.order_date.map(|d| d.format("%d-%m-%Y").to_string()).unwrap_or_else(|| "-".into()),
                o.status.to_string(),
                money(o.total_incl_btw),
            ]
        })
        .collect()
}

const ORDER_HEADERS: [&str; 6] = ["ID", "NUMBER", "CUSTOMER", "DATE", "STATUS", "TOTAL INCL"];

pub fn orders(page: &Page<Order>) -> Table {
    let mut table = Table::new(&ORDER_HEADERS).with_page(page);
    table.rows = order_rows(&page.items);
    table
}

pub fn order_detail(order: &Order) -> Table {
    let mut table = Table::new(&["DESCRIPTION", "QTY", "UNIT", "PRICE EXCL", "TOTAL INCL"]);
    table.rows = order
        .items
        .iter()
        .map(|item| {
            vec![
                item.description.clone(),
                item.quantity.map(|q| q.to_string()).unwrap_or_else(|| "-".into()),
                text(&item.unit),
                money(item.unit_price_excl_btw),
                money(item.total_incl_btw),
            ]
        })
        .collect();
    table.footer = Some(format!(
        "{} {} | subtotal {} | btw {} | total {}",
        order.order_number,
        order.status,
        money(order.subtotal_excl_btw),
        money(order.btw_amount),
        money(order.total_incl_btw)
    ));
    table
}

pub fn documents(page: &Page<GeneratedDocument>) -> Table {
    let mut table = Table::new(&["ID", "NUMBER", "TYPE", "STATUS", "ORDER", "CREATED", "PDF"]).with_page(page);
    table.rows = page
        .items
        .iter()
        .map(|d| {
            vec![
                d.id.clone(),
                text(&d.document_number),
                d.kind().map(|k| k.to_string()).unwrap_or_else(|| "-".into()),
                d.status.map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
                text(&d.order_number),
                text(&d.created_at),
                d.pdf_link().unwrap_or("-").to_string(),
            ]
        })
        .collect();
    table
}

pub fn templates(templates: &[DocumentTemplate]) -> Table {
    let mut table = Table::new(&["TYPE", "NAME", "PLACEHOLDERS", "GOOGLE DOC"]);
    table.rows = templates
        .iter()
        .map(|t| {
            vec![
                t.kind().unwrap_or("-").to_string(),
                t.name.clone(),
                t.placeholders.len().to_string(),
                t.google_doc_link().unwrap_or_else(|| "-".into()),
            ]
        })
        .collect();
    table
}

pub fn dashboard(stats: &DashboardStats) -> Table {
    let mut table = Table::new(&["METRIC", "VALUE"]);
    let overview = &stats.overview;
    table.rows = vec![
        vec!["Customers".into(), overview.customers.to_string()],
        vec!["Products".into(), overview.products.to_string()],
        vec!["Orders".into(), overview.orders.to_string()],
        vec!["Documents".into(), overview.documents.to_string()],
        vec!["Revenue".into(), money(Some(stats.total_revenue()))],
    ];
    for status in &stats.order_status_distribution {
        table
            .rows
            .push(vec![format!("Orders {}", status.status), status.count.to_string()]);
    }
    if !stats.recent_orders.is_empty() {
        table.footer = Some(format!("{} recent orders", stats.recent_orders.len()));
    }
    table
}

pub fn activity(entries: &[Activity]) -> Table {
    let mut table = Table::new(&["WHEN", "USER", "ACTION", "TABLE"]);
    table.rows = entries
        .iter()
        .map(|a| vec![text(&a.created_at), text(&a.user_name), text(&a.action), text(&a.table_name)])
        .collect();
    table
}

pub fn profile(user: &User) -> Table {
    let mut table = Table::new(&["FIELD", "VALUE"]);
    table.rows = vec![
        vec!["Name".into(), user.display_name()],
        vec!["Email".into(), text(&user.email)],
        vec!["Role".into(), user.role.to_string()],
        vec![
            "Permissions".into(),
            if user.role.is_admin() {
                "all (admin)".to_string()
            } else if user.permissions.is_empty() {
                "-".to_string()
            } else {
                user.permissions.join(", ")
            },
        ],
    ];
    table
}
