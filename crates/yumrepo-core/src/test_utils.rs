use std::{
    io::{Read, Write},
    net::{SocketAddr, TcpListener, TcpStream},
    thread::{self, JoinHandle},
};

/// Serves one canned response per incoming connection, in order, and returns
/// the raw request heads it received.
pub struct HttpResponder {
    addr: SocketAddr,
    handle: JoinHandle<Vec<String>>,
}

impl HttpResponder {
    /// Each response is a status line optionally followed by `\r\n`-separated
    /// headers.
    pub fn start(responses: Vec<&str>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let responses: Vec<String> = responses.into_iter().map(String::from).collect();

        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for head in responses {
                let (mut stream, _) = listener.accept().unwrap();
                requests.push(read_request_head(&mut stream));
                let reply = format!("{head}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
                stream.write_all(reply.as_bytes()).unwrap();
                stream.flush().unwrap();
            }
            requests
        });

        Self {
            addr,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn finish(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}

fn read_request_head(stream: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&head).into_owned()
}

/// URL on a local port nothing is listening on.
pub fn refused_url(path: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}{path}")
}

#[cfg(unix)]
pub use self::unix::*;

#[cfg(unix)]
mod unix {
    use std::{
        fs,
        os::unix::fs::PermissionsExt,
        path::{Path, PathBuf},
    };

    use tempfile::{tempdir, TempDir};
    use url::Url;

    /// Output lines use the query tool's `<=>`-separated field order.
    /// `LOCATION` is derived from the `--repofrompath` URL like the real tool.
    const FAKE_REPOQUERY: &str = r#"#!/bin/sh
dir=$(dirname "$0")
echo "$@" >> "$dir/invocations.log"
echo "HOME=$HOME" > "$dir/env.log"
echo "TMPDIR=$TMPDIR" >> "$dir/env.log"
url=""
for arg; do
    case "$arg" in
        --repofrompath=*) url="${arg#*,}" ;;
    esac
    spec="$arg"
done
agent="go-agent<=>0<=>13.1.1<=>16714<=>noarch<=>1365054258<=>$url/go-agent-13.1.1-16714.noarch.rpm<=>(none)<=>http://www.go.cd"
server="go-server<=>0<=>13.1.1<=>16714<=>noarch<=>1365054258<=>$url/go-server-13.1.1-16714.noarch.rpm<=><=>"
php="php<=>0<=>0<=>0<=>noarch<=>2013-04-04 05:33<=>$url/innerFolder/php-0-0.noarch.rpm<=>builder@example.com<=>"
case "$spec" in
    go-agent) echo "$agent" ;;
    go-server) echo "$server" ;;
    'go*')
        echo "$agent"
        echo "$server"
        ;;
    php)
        echo "Loaded plugins: fastestmirror"
        echo "$php"
        ;;
    garbled) echo "go-agent<=>0<=>13.1.1" ;;
    broken)
        echo "Cannot retrieve repository metadata (repomd.xml)" >&2
        exit 1
        ;;
esac
exit 0
"#;

    /// A fake repository directory with `repodata/repomd.xml`.
    pub fn fake_repository() -> (TempDir, String) {
        let dir = tempdir().unwrap();
        let repodata = dir.path().join("repodata");
        fs::create_dir_all(&repodata).unwrap();
        fs::write(repodata.join("repomd.xml"), "<repomd/>").unwrap();
        let url = Url::from_directory_path(dir.path()).unwrap().to_string();
        (dir, url)
    }

    /// Writes an executable fake query tool into `dir`.
    pub fn fake_repoquery(dir: &Path) -> PathBuf {
        let script = dir.join("repoquery");
        fs::write(&script, FAKE_REPOQUERY).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    /// Number of times the fake query tool in `dir` was run.
    pub fn invocation_count(dir: &Path) -> usize {
        fs::read_to_string(dir.join("invocations.log"))
            .map(|log| log.lines().count())
            .unwrap_or(0)
    }
}
