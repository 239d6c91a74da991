//! Integration tests for the crawler
//!
//! These tests serve gopher menus from memory, or from a local TCP
//! listener, and run the full crawl cycle end-to-end.

use gopher_ripple::config::Config;
use gopher_ripple::crawler::{run_crawl, Dispatcher, NetResourceOpener, ResourceOpener};
use gopher_ripple::gopher::Resource;
use gopher_ripple::output::{CrawlStatistics, Grapher};
use gopher_ripple::GopherError;
use std::collections::HashMap;
use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves gopher menus from memory, keyed by canonical resource URI
struct MenuOpener {
    menus: HashMap<String, String>,
}

impl MenuOpener {
    fn new(menus: &[(&str, &str)]) -> Self {
        Self {
            menus: menus
                .iter()
                .map(|(uri, menu)| (uri.to_string(), menu.to_string()))
                .collect(),
        }
    }
}

impl ResourceOpener for MenuOpener {
    type Stream = Cursor<Vec<u8>>;

    async fn open(&self, resource: &Resource) -> io::Result<Self::Stream> {
        match self.menus.get(&resource.key()) {
            Some(menu) => Ok(Cursor::new(menu.clone().into_bytes())),
            None => Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                resource.key(),
            )),
        }
    }
}

/// A dot file sink the test can read after the grapher is closed
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        std::io::Write::write(&mut *self.0.lock().unwrap(), buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Creates a test configuration crawling from `bootstrap`
fn create_test_config(bootstrap: &str, port: &str, crawlers: usize) -> Config {
    let mut config = Config::default();
    config.crawler.bootstrap = bootstrap.to_string();
    config.crawler.port = port.to_string();
    config.crawler.crawlers = crawlers;
    config
}

const TWO_SERVER_GRAPH: &str = "strict digraph {\n\
     \t\"localhost:70\"[alive=true]\n\
     \t\"localhost:70\" -> \"example.com:72\"\n\
     \t\"example.com:72\"[alive=true]\n\
     \t\"example.com:72\" -> \"localhost:70\"\n\
     }\n";

/// Crawls localhost:70 and example.com:72, which reference each other
async fn crawl_two_servers() -> (CrawlStatistics, String) {
    let menus = [
        (
            "gopher://localhost:70/1",
            "iWelcome to localhost\t\terror.host\t1\r\n\
             0About\t/about.txt\tlocalhost\t70\r\n\
             1Elsewhere\t\texample.com\t72\r\n\
             .\r\n",
        ),
        (
            "gopher://example.com:72/1",
            "1Back home\t/\tlocalhost\t70\r\n\
             .\r\n",
        ),
    ];
    let buffer = SharedBuffer::default();
    let grapher = Grapher::new(buffer.clone()).unwrap();
    let config = create_test_config("localhost", "70", 1);

    let stats = Dispatcher::new(&config, MenuOpener::new(&menus), grapher)
        .run()
        .await
        .unwrap();

    (stats, buffer.contents())
}

#[tokio::test]
async fn test_full_crawl_two_servers() {
    let (stats, graph) = crawl_two_servers().await;

    assert_eq!(graph, TWO_SERVER_GRAPH);
    assert_eq!(stats.jobs.finished, 2);
    assert_eq!(stats.jobs.queued, 0);
    assert_eq!(stats.jobs.active, 0);
    assert_eq!(stats.crawl_errors, 0);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.nodes, 2);
    assert_eq!(stats.edges, 2);
    assert!(stats.finished_at.is_some());
}

#[tokio::test]
async fn test_last_findings_are_graphed_before_shutdown() {
    for run in 0..300 {
        let (stats, graph) = crawl_two_servers().await;
        assert_eq!(graph, TWO_SERVER_GRAPH, "run {}", run);
        assert_eq!(stats.jobs.finished, 2, "run {}", run);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_last_findings_are_graphed_before_shutdown_multi_thread() {
    for run in 0..300 {
        let (stats, graph) = crawl_two_servers().await;
        assert_eq!(graph, TWO_SERVER_GRAPH, "run {}", run);
        assert_eq!(stats.jobs.finished, 2, "run {}", run);
    }
}

#[tokio::test]
async fn test_crawl_errors_do_not_stop_crawl() {
    let menus = [
        (
            "gopher://localhost:70/1",
            "1Down\t\tdown.example.com\t70\r\n\
             1Broken\t/broken\tlocalhost\t70\r\n\
             1Fine\t/fine\tlocalhost\t70\r\n\
             .\r\n",
        ),
        ("gopher://localhost:70/1/broken", "this is not a menu\r\n"),
        (
            "gopher://localhost:70/1/fine",
            "1Deeper\t/fine/deeper\tlocalhost\t70\r\n.\r\n",
        ),
        ("gopher://localhost:70/1/fine/deeper", ".\r\n"),
    ];
    let buffer = SharedBuffer::default();
    let grapher = Grapher::new(buffer.clone()).unwrap();
    let config = create_test_config("localhost", "70", 3);

    let stats = Dispatcher::new(&config, MenuOpener::new(&menus), grapher)
        .run()
        .await
        .unwrap();

    assert_eq!(stats.jobs.finished, 5);
    assert_eq!(stats.crawl_errors, 2);
    assert!(buffer
        .contents()
        .contains("\t\"localhost:70\" -> \"down.example.com:70\"\n"));
    assert!(buffer.contents().ends_with("}\n"));
}

#[tokio::test]
async fn test_blacklisted_menus_are_not_crawled() {
    let menus = [
        (
            "gopher://localhost:70/1",
            "1Adventure\t/adventure.run*\tgames.example.com\t70\r\n\
             1Search\t/search.cgi?q=gopher\tlocalhost\t70\r\n\
             1Custom\t/private/stuff\tlocalhost\t70\r\n\
             .\r\n",
        ),
        (
            "gopher://games.example.com:70/1/adventure.run*",
            "1Forever\t/adventure.run*?step=2\tgames.example.com\t70\r\n.\r\n",
        ),
    ];
    let buffer = SharedBuffer::default();
    let grapher = Grapher::new(buffer.clone()).unwrap();
    let mut config = create_test_config("localhost", "70", 2);
    config.blacklist.selectors.push("/private".to_string());

    let stats = Dispatcher::new(&config, MenuOpener::new(&menus), grapher)
        .run()
        .await
        .unwrap();

    assert_eq!(stats.jobs.finished, 1);
    assert_eq!(stats.blacklisted, 3);
    assert_eq!(stats.crawl_errors, 0);
    assert_eq!(buffer.contents(), "strict digraph {\n}\n");
}

#[tokio::test]
async fn test_many_servers_many_crawlers() {
    let mut root = String::new();
    let mut menus = Vec::new();
    for i in 0..20 {
        let host = format!("server{}.example.com", i);
        root.push_str(&format!("1Server {}\t\t{}\t70\r\n", i, host));
        menus.push((
            format!("gopher://{}:70/1", host),
            format!("1Home\t\tlocalhost\t70\r\n1Self\t/\t{}\t70\r\n.\r\n", host),
        ));
    }
    root.push_str(".\r\n");
    menus.push(("gopher://localhost:70/1".to_string(), root));

    let menu_refs: Vec<(&str, &str)> = menus
        .iter()
        .map(|(uri, menu)| (uri.as_str(), menu.as_str()))
        .collect();
    let buffer = SharedBuffer::default();
    let grapher = Grapher::new(buffer.clone()).unwrap();
    let config = create_test_config("localhost", "70", 8);

    let stats = Dispatcher::new(&config, MenuOpener::new(&menu_refs), grapher)
        .run()
        .await
        .unwrap();

    assert_eq!(stats.jobs.finished, 21);
    assert_eq!(stats.crawl_errors, 0);
    assert_eq!(stats.nodes, 21);
    // root to every server, every server back to root and to itself
    assert_eq!(stats.edges, 60);

    let contents = buffer.contents();
    assert!(contents.starts_with("strict digraph {\n"));
    assert!(contents.ends_with("}\n"));
    assert_eq!(contents.matches("[alive=true]").count(), 21);
    assert_eq!(contents.matches(" -> ").count(), 60);
}

/// Serves `menu` to every connection and returns the listener's port
async fn serve_menu(menu: String) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let menu: Arc<str> = Arc::from(menu);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let menu = menu.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut byte = [0u8; 1];
                while socket.read_exact(&mut byte).await.is_ok() {
                    request.push(byte[0]);
                    if request.ends_with(b"\r\n") {
                        break;
                    }
                }
                let _ = socket.write_all(menu.as_bytes()).await;
            });
        }
    });

    port
}

#[tokio::test]
async fn test_run_crawl_over_tcp() {
    let port = serve_menu("iA lonely server\t\terror.host\t1\r\n.\r\n".to_string()).await;
    let dir = tempfile::tempdir().unwrap();
    let dotfile = dir.path().join("graph.dot");

    let mut config = create_test_config("127.0.0.1", &port.to_string(), 2);
    config.output.dotfile = dotfile.to_string_lossy().to_string();

    let stats = run_crawl(config).await.unwrap();

    assert_eq!(stats.jobs.finished, 1);
    assert_eq!(stats.crawl_errors, 0);
    let written = std::fs::read_to_string(&dotfile).unwrap();
    assert_eq!(written, "strict digraph {\n}\n");
}

#[tokio::test]
async fn test_net_opener_follows_references() {
    let leaf = serve_menu("iNothing here\t\terror.host\t1\r\n.\r\n".to_string()).await;
    let root = serve_menu(format!("1Next door\t/\t127.0.0.1\t{}\r\n.\r\n", leaf)).await;

    let buffer = SharedBuffer::default();
    let grapher = Grapher::new(buffer.clone()).unwrap();
    let config = create_test_config("127.0.0.1", &root.to_string(), 2);
    let opener = NetResourceOpener::from_config(&config.crawler);

    let stats = Dispatcher::new(&config, opener, grapher)
        .run()
        .await
        .unwrap();

    assert_eq!(stats.jobs.finished, 2);
    assert_eq!(stats.crawl_errors, 0);
    assert_eq!(stats.nodes, 1);
    assert_eq!(stats.edges, 1);
    assert_eq!(
        buffer.contents(),
        format!(
            "strict digraph {{\n\t\"127.0.0.1:{root}\"[alive=true]\n\t\"127.0.0.1:{root}\" -> \"127.0.0.1:{leaf}\"\n}}\n"
        )
    );
}

#[tokio::test]
async fn test_run_crawl_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let dotfile = dir.path().join("graph.dot");

    let mut config = create_test_config("127.0.0.1", "70", 0);
    config.output.dotfile = dotfile.to_string_lossy().to_string();

    let result = run_crawl(config).await;

    assert!(matches!(result, Err(GopherError::Config(_))));
    assert!(!dotfile.exists());
}
