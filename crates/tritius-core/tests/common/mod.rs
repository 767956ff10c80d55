//! Shared HTML fixtures mimicking the portal's markup.
#![allow(dead_code)]

/// Unauthenticated page carrying the login form and its CSRF token.
pub fn login_page() -> String {
    "<html><body>\
     <form class='login-form' action='/process-login' method='post'>\
     <input type='hidden' name='_csrf' value='token123'>\
     <input name='username' value=''>\
     <input name='password' value=''>\
     <input type='hidden' name='target' value=''>\
     </form></body></html>"
        .to_string()
}

/// Authenticated personal-data page.
pub fn profile_page() -> String {
    "<html><body>\
     <div id='navbar'><ul><li class='dropdown-user'><ul>\
     <li class='hidden-xs'><span class='dropdown-text'>Registrace do: 31.12.2025</span></li>\
     </ul></li></ul></div>\
     <div id='portlet-personal-data'><form>\
     <input name='values[readerNumber]' value='12345'>\
     <input name='values[firstname]' value='Jan'>\
     <input name='values[lastname]' value='Novák'>\
     </form></div>\
     </body></html>"
        .to_string()
}

/// One borrowings-table row; `renewable` controls the renewal form cell.
pub fn borrowing_row(due: &str, title: &str, author: &str, id: u32, renewable: bool) -> String {
    let renewal_cell = if renewable {
        format!("<td><form action='/profile/renew'><input name='id' value='{id}'></form></td>")
    } else {
        "<td></td>".to_string()
    };
    format!(
        "<tr><td></td><td></td><td>{due}</td><td></td>\
         <td><a href='/catalog/{id}'>{title}</a></td><td>{author}</td>\
         <td></td>{renewal_cell}</tr>"
    )
}

/// Authenticated borrowings page; `with_renew_all` adds the page-wide form.
pub fn borrowings_page(rows: &[String], with_renew_all: bool) -> String {
    let renew_all = if with_renew_all {
        "<form action='/profile/renew-all'>\
         <input type='hidden' name='_csrf' value='renewtoken'>\
         <input type='hidden' name='ids' value='all'>\
         </form>"
    } else {
        ""
    };
    format!(
        "<html><body><div id='borrowings-portlet'><div class='portlet-content'>\
         <table><tbody>{}</tbody></table>{renew_all}\
         </div></div></body></html>",
        rows.join("")
    )
}

/// POST response carrying an inline danger alert.
pub fn danger_alert_page(message: &str) -> String {
    format!(
        "<html><body><div class='flash-messages'>\
         <div class='alert alert-danger'><span>{message}</span></div>\
         </div></body></html>"
    )
}

/// Neutral page with none of the expected structure.
pub fn plain_page() -> String {
    "<html><body><p>ok</p></body></html>".to_string()
}
