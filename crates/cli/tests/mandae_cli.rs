// Integration tests for `expedicao mandae`.
// Run with: cargo test -p expedicao-cli --test mandae_cli

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const HEADER: &str = "Destinatário;Razão Social;Email;Telefone;Celular;CPF;CNPJ;\
Inscrição Estadual;Cep;Endereço;Número;Complemento;Bairro;Cidade;Estado;\
Nome do Cliente;Pedido;Frete tipo;Subtotal produtos;Obs. cliente";

fn expedicao(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_expedicao"));
    cmd.current_dir(dir);
    cmd.arg("--config").arg(dir.join("no-settings.json"));
    cmd.env_remove("EXPEDICAO_CONFIG");
    cmd
}

fn latin1(text: &str) -> Vec<u8> {
    let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(text);
    assert!(!had_errors);
    bytes.into_owned()
}

fn order(recipient: &str, id: &str) -> String {
    format!(
        "{recipient};;c@x.com;;11 99999-0000;123.456.789-00;;;01310-100;Av. Paulista;1000;;\
Bela Vista;São Paulo;SP;{recipient};{id};SEDEX;150,00;"
    )
}

fn explain(output: &Output) -> String {
    format!(
        "exit {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr),
    )
}

fn xlsx_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|n| n.ends_with(".xlsx"))
        .collect();
    names.sort();
    names
}

#[test]
fn friday_export_is_named_for_monday() {
    let dir = TempDir::new().unwrap();
    let text = format!("{HEADER}\n{}\n{}\n", order("Ana Souza", "1001"), order("Bruno Lima", "1002"));
    fs::write(dir.path().join("pedidos.csv"), latin1(&text)).unwrap();

    // 2024-03-01 is a Friday
    let output = expedicao(dir.path())
        .args(["mandae", "pedidos.csv", "--date", "2024-03-01", "--out", "mandae"])
        .output()
        .expect("failed to run expedicao");

    assert_eq!(output.status.code(), Some(0), "{}", explain(&output));
    assert_eq!(xlsx_files(&dir.path().join("mandae")), vec!["2Pedidos - 04.03 - L2.xlsx"]);

    let bytes = fs::read(dir.path().join("mandae/2Pedidos - 04.03 - L2.xlsx")).unwrap();
    assert_eq!(&bytes[..2], b"PK");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        "{}",
        explain(&output)
    );
}

#[test]
fn reads_from_stdin() {
    let dir = TempDir::new().unwrap();
    let mut child = expedicao(dir.path())
        .args(["mandae", "-", "--date", "2024-03-05", "--quiet"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run expedicao");

    let text = format!("{HEADER}\n{}\n", order("Ana Souza", "1001"));
    child.stdin.take().unwrap().write_all(&latin1(&text)).unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(0), "{}", explain(&output));
    assert_eq!(xlsx_files(dir.path()), vec!["1Pedidos - 06.03 - L2.xlsx"]);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "./1Pedidos - 06.03 - L2.xlsx"
    );
}

#[test]
fn empty_recipient_exits_4_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let text = format!("{HEADER}\n{}\n{}\n", order("Ana Souza", "1001"), order("", "1002"));
    fs::write(dir.path().join("pedidos.csv"), latin1(&text)).unwrap();

    let output = expedicao(dir.path())
        .args(["mandae", "pedidos.csv", "--date", "2024-03-05"])
        .output()
        .expect("failed to run expedicao");

    assert_eq!(output.status.code(), Some(4), "{}", explain(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("DESTINATÁRIO vazio"));
    assert!(xlsx_files(dir.path()).is_empty());
}

#[test]
fn missing_columns_exits_4() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("pedidos.csv"), latin1("Destinatário;Pedido\nAna;1\n")).unwrap();

    let output = expedicao(dir.path())
        .args(["mandae", "pedidos.csv"])
        .output()
        .expect("failed to run expedicao");

    assert_eq!(output.status.code(), Some(4), "{}", explain(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("'CNPJ'"));
}

#[test]
fn unterminated_quote_exits_3_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let broken = order("Bruno Lima", "1002").replacen("Av. Paulista", "\"Av. Paulista", 1);
    let text = format!("{HEADER}\n{}\n{broken}\n{}\n", order("Ana Souza", "1001"), order("Carla Dias", "1003"));
    fs::write(dir.path().join("pedidos.csv"), latin1(&text)).unwrap();

    let output = expedicao(dir.path())
        .args(["mandae", "pedidos.csv", "--date", "2024-03-05"])
        .output()
        .expect("failed to run expedicao");

    assert_eq!(output.status.code(), Some(3), "{}", explain(&output));
    assert!(xlsx_files(dir.path()).is_empty());
}

#[test]
fn bad_date_exits_2() {
    let dir = TempDir::new().unwrap();
    let output = expedicao(dir.path())
        .args(["mandae", "pedidos.csv", "--date", "05/03/2024"])
        .output()
        .expect("failed to run expedicao");

    assert_eq!(output.status.code(), Some(2), "{}", explain(&output));
}

#[test]
fn unreadable_input_exits_3() {
    let dir = TempDir::new().unwrap();
    let output = expedicao(dir.path())
        .args(["mandae", "nao-existe.csv"])
        .output()
        .expect("failed to run expedicao");

    assert_eq!(output.status.code(), Some(3), "{}", explain(&output));
}
