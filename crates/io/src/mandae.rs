//! Order export → Mandaê intake rows.
//!
//! Every output column is a copy of one source column, a fixed literal, or a
//! digits-only cleanup of a source column. Rows are never dropped or reordered.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::csv::{OrderRow, Table};
use crate::error::InputError;

static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").unwrap());

/// Recipient name; must be filled on every row.
pub const RECIPIENT: &str = "Destinatário";

/// Source columns the order export must carry.
pub const SOURCE_COLUMNS: [&str; 20] = [
    RECIPIENT,
    "Razão Social",
    "Email",
    "Telefone",
    "Celular",
    "CPF",
    "CNPJ",
    "Inscrição Estadual",
    "Cep",
    "Endereço",
    "Número",
    "Complemento",
    "Bairro",
    "Cidade",
    "Estado",
    "Nome do Cliente",
    "Pedido",
    "Frete tipo",
    "Subtotal produtos",
    "Obs. cliente",
];

pub const COLUMN_COUNT: usize = 22;

/// Intake headers, in sheet order (columns A..V).
pub const OUTPUT_HEADERS: [&str; COLUMN_COUNT] = [
    "NOME DO DESTINATÁRIO*",
    "NOME DA EMPRESA (EM CASO DE ENDEREÇO COMERCIAL)",
    "E-MAIL",
    "TELEFONE",
    "CPF / CNPJ CLIENTE*",
    "INSCR. ESTADUAL",
    "CEP*",
    "LOGRADOURO*",
    "NÚMERO*",
    "COMPLEMENTO",
    "BAIRRO*",
    "CIDADE*",
    "ESTADO*",
    "PONTO DE REFERÊNCIA",
    "VOLUMES*",
    "A ENCOMENDA POSSUI NF?*",
    "CHAVE NF",
    "CÓDIGO INTERNO DA SUA EMPRESA (OPCIONAL)",
    "SERVIÇO DE ENVIO*",
    "QR CODE (Não utilizar)",
    "VALOR DECLARADO (OPCIONAL)",
    "OBSERVAÇÃO",
];

const VOLUMES: &str = "1";
const HAS_INVOICE: &str = "Sim";

/// One row of the partner's 22-column intake sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MandaeRow {
    pub recipient_name: String,
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub document: String,
    pub state_registration: String,
    pub postal_code: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub reference_point: String,
    pub volumes: String,
    pub has_invoice: String,
    pub invoice_key: String,
    pub internal_code: String,
    pub shipping_service: String,
    pub qr_code: String,
    pub declared_value: String,
    pub notes: String,
}

impl MandaeRow {
    pub fn from_order(row: &OrderRow<'_>) -> Self {
        let copy = |column: &str| row.cell(column).to_string();

        Self {
            recipient_name: copy(RECIPIENT),
            company_name: copy("Razão Social"),
            email: copy("Email"),
            phone: pick_phone(row.present("Telefone"), row.present("Celular")),
            document: format_document(row.present("CPF"), row.present("CNPJ")),
            state_registration: copy("Inscrição Estadual"),
            postal_code: clean_postal_code(row.cell("Cep")),
            street: copy("Endereço"),
            number: copy("Número"),
            complement: copy("Complemento"),
            district: copy("Bairro"),
            city: copy("Cidade"),
            state: copy("Estado"),
            reference_point: String::new(),
            volumes: VOLUMES.to_string(),
            has_invoice: HAS_INVOICE.to_string(),
            invoice_key: copy("Nome do Cliente"),
            internal_code: copy("Pedido"),
            shipping_service: copy("Frete tipo"),
            qr_code: String::new(),
            declared_value: copy("Subtotal produtos"),
            notes: copy("Obs. cliente"),
        }
    }

    /// Cell values in sheet order, matching [`OUTPUT_HEADERS`].
    pub fn cells(&self) -> [&str; COLUMN_COUNT] {
        [
            self.recipient_name.as_str(),
            self.company_name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.document.as_str(),
            self.state_registration.as_str(),
            self.postal_code.as_str(),
            self.street.as_str(),
            self.number.as_str(),
            self.complement.as_str(),
            self.district.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.reference_point.as_str(),
            self.volumes.as_str(),
            self.has_invoice.as_str(),
            self.invoice_key.as_str(),
            self.internal_code.as_str(),
            self.shipping_service.as_str(),
            self.qr_code.as_str(),
            self.declared_value.as_str(),
            self.notes.as_str(),
        ]
    }
}

/// Validate the export, then map every row.
///
/// Validation runs over the whole table first, so a bad row anywhere means
/// no rows are mapped.
pub fn map_orders(table: &Table) -> Result<Vec<MandaeRow>, InputError> {
    let required: Vec<(&str, &str)> = SOURCE_COLUMNS.iter().map(|c| (*c, *c)).collect();
    table.require_columns(&required)?;

    if let Some(row) = table.rows().find(|row| row.present(RECIPIENT).is_none()) {
        return Err(InputError::EmptyField {
            column: RECIPIENT.to_string(),
            line: row.line(),
        });
    }

    Ok(table.rows().map(|row| MandaeRow::from_order(&row)).collect())
}

/// CNPJ wins over CPF. Digits only, left-padded with zeros to 14 (CNPJ) or 11 (CPF).
pub fn format_document(cpf: Option<&str>, cnpj: Option<&str>) -> String {
    match (cnpj, cpf) {
        (Some(cnpj), _) => zero_pad(&digits_only(cnpj), 14),
        (None, Some(cpf)) => zero_pad(&digits_only(cpf), 11),
        (None, None) => String::new(),
    }
}

/// Landline when present, otherwise mobile.
pub fn pick_phone(landline: Option<&str>, mobile: Option<&str>) -> String {
    landline.or(mobile).unwrap_or_default().to_string()
}

pub fn clean_postal_code(raw: &str) -> String {
    digits_only(raw)
}

fn digits_only(raw: &str) -> String {
    NON_DIGIT.replace_all(raw, "").into_owned()
}

fn zero_pad(digits: &str, width: usize) -> String {
    format!("{digits:0>width$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn export_bytes(rows: &[[&str; 20]]) -> Vec<u8> {
        let mut text = SOURCE_COLUMNS.join(";");
        text.push('\n');
        for row in rows {
            text.push_str(&row.join(";"));
            text.push('\n');
        }
        let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(&text);
        bytes.into_owned()
    }

    fn sample(name: &str) -> [&str; 20] {
        [
            name, "ACME Ltda", "ana@example.com", "1133334444", "11999999999",
            "123.456.789-00", "", "", "01310-100", "Av. Paulista", "1000", "ap 12",
            "Bela Vista", "São Paulo", "SP", "NF-1", "5001", "Expresso", "199,90", "frágil",
        ]
    }

    #[test]
    fn test_document_prefers_cnpj() {
        assert_eq!(
            format_document(Some("123.456.789-00"), Some("12.345.678/0001-99")),
            "12345678000199"
        );
    }

    #[test]
    fn test_document_cpf_padding() {
        assert_eq!(format_document(Some("123.456.789-00"), None), "12345678900");
        assert_eq!(format_document(Some("1.234.567-89"), None), "00123456789");
    }

    #[test]
    fn test_document_cnpj_padding() {
        assert_eq!(format_document(None, Some("5.678/0001-99")), "00005678000199");
    }

    #[test]
    fn test_document_absent() {
        assert_eq!(format_document(None, None), "");
    }

    #[test]
    fn test_phone_fallback_to_mobile() {
        assert_eq!(pick_phone(None, Some("11999999999")), "11999999999");
        assert_eq!(pick_phone(Some("1133334444"), Some("11999999999")), "1133334444");
        assert_eq!(pick_phone(None, None), "");
    }

    #[test]
    fn test_postal_code_digits_only() {
        assert_eq!(clean_postal_code("01310-100"), "01310100");
        assert_eq!(clean_postal_code(" 01.310-100 "), "01310100");
    }

    #[test]
    fn test_map_orders_full_row() {
        let table = crate::csv::parse_latin1(&export_bytes(&[sample("Ana Souza")])).unwrap();
        let rows = map_orders(&table).unwrap();
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.recipient_name, "Ana Souza");
        assert_eq!(row.company_name, "ACME Ltda");
        assert_eq!(row.phone, "1133334444");
        assert_eq!(row.document, "12345678900");
        assert_eq!(row.postal_code, "01310100");
        assert_eq!(row.city, "São Paulo");
        assert_eq!(row.reference_point, "");
        assert_eq!(row.volumes, "1");
        assert_eq!(row.has_invoice, "Sim");
        assert_eq!(row.qr_code, "");
        assert_eq!(row.notes, "frágil");

        let cells = row.cells();
        assert_eq!(cells.len(), OUTPUT_HEADERS.len());
        assert_eq!(cells[0], "Ana Souza");
        assert_eq!(cells[14], "1");
        assert_eq!(cells[21], "frágil");
    }

    #[test]
    fn test_empty_recipient_aborts_whole_run() {
        let bytes = export_bytes(&[sample("Ana"), sample(""), sample("Bia")]);
        let table = crate::csv::parse_latin1(&bytes).unwrap();

        let err = map_orders(&table).unwrap_err();
        assert_eq!(
            err,
            InputError::EmptyField { column: RECIPIENT.to_string(), line: 3 }
        );
    }

    #[test]
    fn test_missing_source_columns_listed() {
        let table = crate::csv::parse_latin1("Destinatário;Email\nAna;a@b\n".as_bytes()).unwrap();
        match map_orders(&table).unwrap_err() {
            InputError::MissingColumns(cols) => {
                assert!(cols.contains(&"CNPJ".to_string()));
                assert!(cols.contains(&"Obs. cliente".to_string()));
                assert!(!cols.contains(&"Email".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn prop_row_count_preserved(names in proptest::collection::vec("[A-Za-z]{1,12}", 0..40)) {
            let rows: Vec<[&str; 20]> = names.iter().map(|name| sample(name)).collect();
            let table = crate::csv::parse_latin1(&export_bytes(&rows)).unwrap();
            let mapped = map_orders(&table).unwrap();
            prop_assert_eq!(mapped.len(), names.len());
            for (row, name) in mapped.iter().zip(&names) {
                prop_assert_eq!(&row.recipient_name, name);
            }
        }

        #[test]
        fn prop_document_width(digits in "[0-9]{1,11}", cnpj in proptest::bool::ANY) {
            let doc = if cnpj {
                format_document(None, Some(&digits))
            } else {
                format_document(Some(&digits), None)
            };
            prop_assert_eq!(doc.len(), if cnpj { 14 } else { 11 });
            prop_assert!(doc.ends_with(&digits));
        }
    }
}
