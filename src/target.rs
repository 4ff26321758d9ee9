/// The single URL a run probes, parsed once before the pipeline starts.
#[derive(Debug, Clone)]
pub struct Target {
    pub host: String,
    pub port: u16,
    pub url: String,
}

impl Target {
    pub fn from_url(url: &str) -> Result<Self, anyhow::Error> {
        let uri: hyper::Uri = url.parse()?;
        let host = uri
            .host()
            .ok_or(anyhow!("Can not find host in the uri:{}.", url))?
            .to_string();
        match uri.scheme_str() {
            Some("https") => {}
            Some(other) => {
                return Err(anyhow!(
                    "Unsupported scheme '{}' in the uri:{}, only https is supported.",
                    other,
                    url
                ))
            }
            None => return Err(anyhow!("Can not find scheme in the uri:{}.", url)),
        }
        let port = uri.port_u16().unwrap_or(443);
        Ok(Target {
            host,
            port,
            url: url.to_string(),
        })
    }
}
