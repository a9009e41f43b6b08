use std::fs;
use std::path::Path;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub fn fund_page(quote: &str, dividends: &[&str]) -> String {
        let rows: String = dividends
            .iter()
            .map(|d| format!("<tr><td>Dividendos</td><td>30/09/2026</td><td>14/10/2026</td><td>{d}</td></tr>"))
            .collect();
        format!(
            r#"<!DOCTYPE html><html><head><title>FII</title></head><body>
            <div class="quotation"><strong class="livePrice">{quote}</strong></div>
            <section id="cards-ticker">
              <div class="_card cotacao"><span title="Cotação">Cotação</span><div class="_card-body"><span>{quote}</span></div></div>
              <div class="_card dy"><span title="Dividend Yield">DY (12M)</span><div class="_card-body"><span>7,50%</span></div></div>
              <div class="_card vp"><span title="P/VP">P/VP</span><div class="_card-body"><span>1,02</span></div></div>
            </section>
            <div id="table-indicators">
              <div class="desc"><span class="name">Tipo de Fundo</span><div class="value"><span>Fundo de Tijolo</span></div></div>
              <div class="desc"><span class="name">Segmento</span><div class="value"><span>Logística</span></div></div>
              <div class="desc"><span class="name">Valor Patrimonial</span><div class="value"><span>R$ 2,1 Bilhões</span></div></div>
              <div class="desc"><span class="name">Numero de cotistas</span><div class="value"><span>312.456</span></div></div>
            </div>
            <table id="table-dividends-history"><thead><tr><th>Tipo</th><th>Data com</th><th>Pagamento</th><th>Valor</th></tr></thead>
              <tbody>{rows}</tbody>
            </table>
            </body></html>"#
        )
    }

    pub async fn mount_fund(server: &MockServer, ticker: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/fiis/{ticker}/")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }
}

fn write_config(dir: &Path, base_url: &str, tickers: &str, policy: &str) -> std::path::PathBuf {
    let input = dir.join("fiis.csv");
    fs::write(&input, tickers).expect("Failed to write ticker list");

    let config_path = dir.join("config.yaml");
    let config_content = format!(
        r#"
        input: "{}"
        output: "{}"
        work_dir: "{}"
        source:
          base_url: "{}"
        renderer:
          kind: http
        on_render_error: {}
    "#,
        input.display(),
        dir.join("saida.csv").display(),
        dir.display(),
        base_url,
        policy
    );
    fs::write(&config_path, config_content).expect("Failed to write config file");
    config_path
}

fn read_report(dir: &Path) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(dir.join("saida.csv"))
        .expect("Report should exist")
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

fn leftover_pages(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .starts_with("pagina_")
        })
        .count()
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let server = wiremock::MockServer::start().await;
    let page = test_utils::fund_page("R$ 98,50", &["0,55"; 6]);
    test_utils::mount_fund(&server, "abcd11", 200, &page).await;

    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(dir.path(), &server.uri(), "Ticker,Ncotas\nABCD11,50\n", "abort");

    let result = fiis::run_command(
        fiis::AppCommand::Run(Default::default()),
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Run failed with: {:?}", result.err());

    let rows = read_report(dir.path());
    info!(?rows, "Report");
    assert_eq!(rows[0][14], "TOTAIS");
    assert_eq!(
        rows[1][..13],
        [
            "ABCD11",
            "50",
            "98.50",
            "4925.00",
            "1.02",
            "0.5500",
            "27.50",
            "7,50%",
            "Fundo de Tijolo",
            "Logística",
            "R$ 2,1 Bilhões",
            "312.456",
            "0.0056"
        ]
    );
    assert_eq!(rows[1][14], "Total gasto em R$: 4925.00");
    assert_eq!(rows[2][14], "Acréscimo de dividendos em R$: 27.50");
    assert_eq!(leftover_pages(dir.path()), 0);
}

#[test_log::test(tokio::test)]
async fn test_render_failure_is_skipped_and_marked() {
    let server = wiremock::MockServer::start().await;
    let page = test_utils::fund_page("R$ 10,00", &["0,10", "0,12", "0,11", "0,09", "0,13", "0,10"]);
    test_utils::mount_fund(&server, "good11", 200, &page).await;
    test_utils::mount_fund(&server, "gone11", 500, "").await;

    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(
        dir.path(),
        &server.uri(),
        "Ticker,Ncotas\ngood11,100\ngone11,10\ngood11,100\n",
        "skip",
    );

    let result = fiis::run_command(
        fiis::AppCommand::Run(Default::default()),
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Run failed with: {:?}", result.err());

    let rows = read_report(dir.path());
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1][0], "GOOD11");
    assert_eq!(rows[1][5], "0.1083");
    assert_eq!(rows[2][0], "GONE11");
    assert_eq!(rows[2][1], "10");
    assert!(rows[2][2..13].iter().all(|c| c == "ERRO"));
    assert_eq!(rows[3][0], "GOOD11");
    assert_eq!(rows[1][14], "Total gasto em R$: 2000.00");
    assert_eq!(rows[2][14], "Acréscimo de dividendos em R$: 21.66");
    assert_eq!(leftover_pages(dir.path()), 0);
}

#[test_log::test(tokio::test)]
async fn test_render_failure_aborts_when_configured() {
    let server = wiremock::MockServer::start().await;
    test_utils::mount_fund(&server, "gone11", 404, "").await;

    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(dir.path(), &server.uri(), "Ticker,Ncotas\nGONE11,1\n", "abort");

    let result = fiis::run_command(
        fiis::AppCommand::Run(Default::default()),
        Some(config_path.to_str().unwrap()),
    )
    .await;
    let err = result.expect_err("Run should fail");
    assert!(format!("{err:#}").contains("HTTP error: 404 Not Found"));
    assert!(!dir.path().join("saida.csv").exists());
}

#[test_log::test(tokio::test)]
async fn test_missing_dividend_history_is_reported_as_not_available() {
    let server = wiremock::MockServer::start().await;
    let page = test_utils::fund_page("R$ 100,00", &["0,80", "0,80", "n/a", "0,80", "0,80", "0,80"]);
    test_utils::mount_fund(&server, "part11", 200, &page).await;

    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(dir.path(), &server.uri(), "Ticker,Ncotas\npart11,10\n", "abort");

    fiis::run_command(
        fiis::AppCommand::Run(Default::default()),
        Some(config_path.to_str().unwrap()),
    )
    .await
    .expect("Run should succeed");

    let rows = read_report(dir.path());
    assert_eq!(rows[1][3], "1000.00");
    assert_eq!(rows[1][5], "N/D");
    assert_eq!(rows[1][6], "N/D");
    assert_eq!(rows[1][12], "N/D");
    assert_eq!(rows[2][14], "Acréscimo de dividendos em R$: 0.00");
}
