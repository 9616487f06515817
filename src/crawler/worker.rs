//! Crawler worker loop
//!
//! Each worker pops URLs from the shared frontier until it is empty, then
//! waits for the download queue to drain before reporting back.

use crate::crawler::fetcher::{content_type_of, fetch_url};
use crate::crawler::parser::parse_links;
use crate::download::{DownloadQueue, DownloadTask, QueueClosed, ResourceKind};
use crate::robots::RobotsCache;
use crate::storage::Frontier;
use crate::url::priority_for;
use reqwest::{Client, Response};
use std::sync::Arc;
use url::Url;

/// One member of the crawler pool
pub struct CrawlWorker {
    id: usize,
    frontier: Frontier,
    client: Client,
    robots: Arc<RobotsCache>,
    queue: Arc<DownloadQueue>,
}

impl CrawlWorker {
    pub fn new(
        id: usize,
        frontier: Frontier,
        client: Client,
        robots: Arc<RobotsCache>,
        queue: Arc<DownloadQueue>,
    ) -> Self {
        Self {
            id,
            frontier,
            client,
            robots,
            queue,
        }
    }

    /// Runs until `pop_next` finds nothing, then waits on the drain barrier
    ///
    /// Returns the number of URLs this worker popped. A frontier storage
    /// failure stops the worker with an error; every other failure only
    /// abandons the URL at hand.
    pub async fn run(self) -> crate::Result<usize> {
        tracing::debug!("Crawler worker {} started", self.id);
        let mut processed = 0;

        while let Some(raw) = self.frontier.pop_next()? {
            processed += 1;
            self.process_url(&raw).await?;
        }

        tracing::debug!(
            "Crawler worker {} found the frontier empty after {} URLs, waiting for downloads",
            self.id,
            processed
        );
        self.queue.join().await;

        Ok(processed)
    }

    async fn process_url(&self, raw: &str) -> crate::Result<()> {
        let url = match Url::parse(raw) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Abandoning unparsable URL {}: {}", raw, e);
                return Ok(());
            }
        };

        if !self.robots.can_fetch(&url).await {
            tracing::debug!("Disallowed by robots.txt: {}", url);
            return Ok(());
        }

        tracing::debug!("Fetching {}", url);
        let response = match fetch_url(&self.client, &url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Abandoning {}: {}", url, e);
                return Ok(());
            }
        };

        let Some(content_type) = content_type_of(&response) else {
            tracing::debug!("No content-type for {}", url);
            return Ok(());
        };

        match ResourceKind::classify(&content_type) {
            ResourceKind::Html => self.harvest_links(&url, response).await?,
            ResourceKind::Archive | ResourceKind::Raw => {
                if let Err(QueueClosed(task)) =
                    self.queue.push(DownloadTask::new(url, content_type, response))
                {
                    tracing::warn!("Download queue closed, dropping {}", task.url);
                }
            }
            ResourceKind::Other => {
                tracing::debug!("Discarding {} ({})", url, content_type);
            }
        }

        Ok(())
    }

    async fn harvest_links(&self, url: &Url, response: Response) -> crate::Result<()> {
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Could not read page {}: {}", url, e);
                return Ok(());
            }
        };

        let links = parse_links(&body, url);
        let inserted = self
            .frontier
            .enqueue_all(links.iter().map(|link| (link.as_str(), priority_for(link))))?;

        tracing::debug!(
            "{}: {} links, {} new to the frontier",
            url,
            links.len(),
            inserted
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;
    use std::num::NonZeroUsize;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Harness {
        server: MockServer,
        frontier: Frontier,
        queue: Arc<DownloadQueue>,
        robots: Arc<RobotsCache>,
    }

    impl Harness {
        async fn new() -> Self {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/robots.txt"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
                )
                .mount(&server)
                .await;

            Self {
                server,
                frontier: Frontier::new(SqliteStorage::new_in_memory().unwrap()),
                queue: Arc::new(DownloadQueue::new()),
                robots: Arc::new(RobotsCache::new(
                    Client::new(),
                    NonZeroUsize::new(8).unwrap(),
                )),
            }
        }

        fn url(&self, route: &str) -> String {
            format!("{}{}", self.server.uri(), route)
        }

        fn worker(&self) -> CrawlWorker {
            CrawlWorker::new(
                0,
                self.frontier.clone(),
                Client::new(),
                Arc::clone(&self.robots),
                Arc::clone(&self.queue),
            )
        }
    }

    #[tokio::test]
    async fn test_html_links_enter_frontier() {
        let h = Harness::new().await;
        let page = r##"<a href="/chair.zip">zip</a><a href="/about.html">about</a><a href="#top">top</a>"##;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(page, "text/html"))
            .mount(&h.server)
            .await;

        h.worker().process_url(&h.url("/")).await.unwrap();

        let zip = h.frontier.get_record(&h.url("/chair.zip")).unwrap().unwrap();
        assert_eq!(zip.priority, 1);
        let about = h.frontier.get_record(&h.url("/about.html")).unwrap().unwrap();
        assert_eq!(about.priority, 2);
        assert_eq!(h.frontier.count_total().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_downloads_are_queued() {
        let h = Harness::new().await;
        Mock::given(method("GET"))
            .and(path("/chair.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 10], "application/zip"))
            .mount(&h.server)
            .await;

        h.worker().process_url(&h.url("/chair.zip")).await.unwrap();

        assert_eq!(h.queue.pending(), 1);
        let task = h.queue.pop().await.unwrap();
        assert_eq!(task.kind, ResourceKind::Archive);
        assert_eq!(task.content_length, Some(10));
    }

    #[tokio::test]
    async fn test_robots_disallow_skips_fetch() {
        let h = Harness::new().await;
        Mock::given(method("GET"))
            .and(path("/private/secret.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 10], "application/zip"))
            .expect(0)
            .mount(&h.server)
            .await;

        h.worker()
            .process_url(&h.url("/private/secret.zip"))
            .await
            .unwrap();
        assert_eq!(h.queue.pending(), 0);
    }

    #[tokio::test]
    async fn test_other_content_is_discarded() {
        let h = Harness::new().await;
        Mock::given(method("GET"))
            .and(path("/logo.png"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 10], "image/png"))
            .mount(&h.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&h.server)
            .await;

        let worker = h.worker();
        worker.process_url(&h.url("/logo.png")).await.unwrap();
        worker.process_url(&h.url("/gone")).await.unwrap();
        worker.process_url("not a url").await.unwrap();

        assert_eq!(h.queue.pending(), 0);
        assert_eq!(h.frontier.count_total().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_run_stops_on_empty_frontier() {
        let h = Harness::new().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"<a href="/next">next</a>"#, "text/html"),
            )
            .mount(&h.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/next"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<p>end</p>", "text/html"))
            .mount(&h.server)
            .await;

        h.frontier.enqueue_or_bump(&h.url("/"), 2).unwrap();
        let processed = h.worker().run().await.unwrap();

        assert_eq!(processed, 2);
        assert_eq!(h.frontier.count_unvisited().unwrap(), 0);
    }
}
