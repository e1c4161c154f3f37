//! Email and CSV fixtures

/// Headered export, 3 rows including the header
pub const TICKETS_JULY: &str = "id,name,amount\n1,alice,10.5\n2,bob,3.25\n";

/// Headered export, 4 rows including the header
pub const TICKETS_AUGUST: &str = "id,name,amount\n3,carol,7.75\n4,dave,1.5\n5,erin,2.0\n";

/// Export without a header row, 3 rows
pub const TICKETS_NO_HEADER: &str = "6,frank,4.5\n7,grace,8.25\n8,heidi,9.0\n";

/// Build a multipart/alternative email whose HTML part links to every URL in `hrefs`
///
/// The plain-text alternative mentions a decoy CSV URL that must never be picked up.
pub fn email_with_links(hrefs: &[String]) -> String {
    let anchors: String = hrefs
        .iter()
        .enumerate()
        .map(|(i, href)| format!("<p><a href=\"{href}\">Export {i}</a></p>\r\n"))
        .collect();

    format!(
        "From: reports@example.com\r\n\
To: ops@example.com\r\n\
Subject: Your ticket exports\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/alternative; boundary=\"=_exports\"\r\n\
\r\n\
--=_exports\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
Plain text copy: http://decoy.invalid/plain.csv\r\n\
--=_exports\r\n\
Content-Type: text/html; charset=utf-8\r\n\
\r\n\
<html><body>\r\n\
{anchors}\
</body></html>\r\n\
--=_exports--\r\n"
    )
}

/// An email without any hyperlinks
pub const EMAIL_WITHOUT_LINKS: &str = "From: reports@example.com\r\n\
To: ops@example.com\r\n\
Subject: Nothing today\r\n\
Content-Type: text/html; charset=utf-8\r\n\
\r\n\
<html><body><p>No exports were generated.</p></body></html>\r\n";
