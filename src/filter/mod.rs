/*!
 * Access Filter
 * Pre-action interception for routed controller actions
 *
 * Every action is identified by its `module/controller/action` route, which is
 * also the permission name checked before it runs. A denial stops the dispatch
 * with a 403 `AccessDenied` before the handler is called.
 */

pub mod interceptor;
pub mod route;

pub use interceptor::{AccessDenied, AccessFilter, ActionDispatcher, ActionFilter};
pub use route::ActionRoute;
