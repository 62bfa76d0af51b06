//! Types used to represent particular elements on a page.

use crate::error;
use crate::session::Client;
use crate::wd::Cmd;
use serde_json::Value as Json;
use webdriver::common::ELEMENT_KEY;

/// A single DOM element on the current page.
///
/// Note that there is a lot of subtlety in how you can interact with an element through WebDriver,
/// which [the WebDriver standard goes into detail on](https://www.w3.org/TR/webdriver1/#elements).
/// The same goes for inspecting [element state](https://www.w3.org/TR/webdriver1/#element-state).
#[derive(Clone, Debug)]
pub struct Element {
    pub(crate) client: Client,
    pub(crate) element: String,
}

impl Element {
    /// Retrieve the text contents of this element.
    ///
    /// See [13.5 Get Element Text](https://www.w3.org/TR/webdriver1/#get-element-text) of the
    /// WebDriver standard.
    pub async fn text(&mut self) -> Result<String, error::CmdError> {
        match self
            .client
            .issue(Cmd::GetElementText(self.element.clone()))
            .await?
        {
            Json::String(v) => Ok(v),
            v => Err(error::CmdError::NotW3C(v)),
        }
    }

    /// Simulate the user clicking on this element.
    ///
    /// Note that since this *may* result in navigation, we give up the handle to the element.
    ///
    /// See [14.1 Element Click](https://www.w3.org/TR/webdriver1/#element-click) of the
    /// WebDriver standard.
    pub async fn click(self) -> Result<Client, error::CmdError> {
        let Self {
            mut client,
            element,
        } = self;
        let r = client.issue(Cmd::ElementClick(element)).await?;
        if r.is_null() || r.as_object().map(|o| o.is_empty()).unwrap_or(false) {
            // geckodriver returns {} :(
            Ok(client)
        } else {
            Err(error::CmdError::NotW3C(r))
        }
    }
}

/// Extract the element reference from a `Find Element` response value.
pub(crate) fn parse_lookup(res: Json) -> Result<String, error::CmdError> {
    let mut res = match res {
        Json::Object(o) => o,
        res => return Err(error::CmdError::NotW3C(res)),
    };

    match res.remove(ELEMENT_KEY) {
        Some(Json::String(wei)) => Ok(wei),
        Some(v) => {
            res.insert(ELEMENT_KEY.to_string(), v);
            Err(error::CmdError::NotW3C(Json::Object(res)))
        }
        None => Err(error::CmdError::NotW3C(Json::Object(res))),
    }
}
